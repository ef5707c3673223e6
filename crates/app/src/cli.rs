//! Command-line interface of the `hrm` binary.

use std::error::Error;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use hrm_application::ApplicationError;
use hrm_application::ports::Notifier;
use hrm_domain::{
    Branch, BranchForm, Credentials, Department, DepartmentForm, ListView, PasswordResetForm,
    RecordId, RegistrationForm, Searchable, ValidationErrors,
};
use hrm_infrastructure::ClientConfig;
use tracing::debug;

use crate::HrmClient;

/// Result type of command handlers.
pub type CliResult = Result<(), Box<dyn Error>>;

/// Command line of the `hrm` binary.
#[derive(Parser, Debug)]
#[command(name = "hrm")]
#[command(version)]
#[command(about = "HRM Console - manage your organization from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Sign out and remove the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Register a new organization
    Register {
        /// Administrator email
        #[arg(long)]
        email: String,
        /// Password
        #[arg(long)]
        password: String,
        /// Password again
        #[arg(long)]
        confirm_password: String,
        /// Organization name
        #[arg(long)]
        organization: String,
        /// Accept the terms of service
        #[arg(long)]
        accept_terms: bool,
    },
    /// Send a new verification code
    ResendOtp {
        /// Email the code is sent to
        #[arg(long)]
        email: String,
    },
    /// Confirm a registration with the emailed code
    VerifyOtp {
        /// Six-digit code
        otp: String,
    },
    /// Set a new password
    ResetPassword {
        /// Account email
        #[arg(long)]
        email: String,
        /// New password
        #[arg(long)]
        new_password: String,
    },
    /// Manage branches
    Branch {
        #[command(subcommand)]
        command: BranchCommand,
    },
    /// Manage departments
    Department {
        #[command(subcommand)]
        command: DepartmentCommand,
    },
}

/// Search and paging options for list commands.
#[derive(Args, Debug, Clone)]
struct ListArgs {
    /// Only show rows whose name contains this text
    #[arg(long, default_value = "")]
    search: String,
    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Rows per page
    #[arg(long, default_value_t = hrm_domain::organization::DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

#[derive(Args, Debug, Clone, Default)]
struct BranchFields {
    /// Branch name
    #[arg(long)]
    name: Option<String>,
    /// Province
    #[arg(long)]
    province: Option<String>,
    /// District
    #[arg(long)]
    district: Option<String>,
    /// Ward
    #[arg(long)]
    ward: Option<String>,
    /// Street address
    #[arg(long)]
    address: Option<String>,
    /// Contact email
    #[arg(long)]
    email: Option<String>,
    /// Contact phone
    #[arg(long)]
    phone: Option<String>,
    /// Tax code
    #[arg(long)]
    tax_code: Option<String>,
}

impl BranchFields {
    /// Overwrites the fields given on the command line.
    fn apply(self, form: &mut BranchForm) {
        let targets = [
            (self.name, &mut form.branch_name),
            (self.province, &mut form.province),
            (self.district, &mut form.district),
            (self.ward, &mut form.ward),
            (self.address, &mut form.specific_address),
            (self.email, &mut form.email),
            (self.phone, &mut form.phone_number),
            (self.tax_code, &mut form.tax_code),
        ];
        for (value, target) in targets {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

#[derive(Subcommand, Debug)]
enum BranchCommand {
    /// List branches
    List(ListArgs),
    /// Create a branch
    Create(BranchFields),
    /// Change a branch; omitted fields keep their value
    Update {
        /// Branch id
        id: RecordId,
        #[command(flatten)]
        fields: BranchFields,
    },
    /// Delete branches
    Delete {
        /// Branch ids
        #[arg(required = true)]
        ids: Vec<RecordId>,
    },
}

#[derive(Args, Debug, Clone)]
struct DepartmentFields {
    /// Department name
    #[arg(long)]
    name: String,
    /// Hierarchy level
    #[arg(long)]
    level: String,
    /// Owning branch id
    #[arg(long)]
    branch_id: String,
    /// Parent department id
    #[arg(long, default_value = "")]
    parent_id: String,
}

impl From<DepartmentFields> for DepartmentForm {
    fn from(fields: DepartmentFields) -> Self {
        Self {
            department_name: fields.name,
            level: fields.level,
            branch_id: fields.branch_id,
            parent_department_id: fields.parent_id,
        }
    }
}

#[derive(Subcommand, Debug)]
enum DepartmentCommand {
    /// List departments
    List(ListArgs),
    /// Create a department
    Create(DepartmentFields),
    /// Replace a department
    Update {
        /// Department id
        id: RecordId,
        #[command(flatten)]
        fields: DepartmentFields,
    },
    /// Delete departments
    Delete {
        /// Department ids
        #[arg(required = true)]
        ids: Vec<RecordId>,
    },
}

/// Prints notifications to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, title: &str, message: &str) {
        println!("{title}: {message}");
    }

    fn error(&self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }
}

/// Runs a parsed command line.
///
/// # Errors
///
/// Returns the error of the failed command.
pub async fn run(cli: Cli) -> CliResult {
    let config = ClientConfig::from_env()?;
    debug!(
        api_url = %config.api_url,
        state_dir = %config.state_dir.display(),
        "configuration loaded"
    );
    let client = HrmClient::open(config, Arc::new(ConsoleNotifier)).await?;
    execute(&client, cli.command).await
}

/// Renders an error for the terminal.
#[must_use]
pub fn describe_error(error: &(dyn Error + 'static)) -> String {
    match error.downcast_ref::<ApplicationError>() {
        Some(e) if e.is_session_expired() => {
            "Your session has expired. Run `hrm login` to sign in again.".to_string()
        }
        Some(ApplicationError::Validation(errors)) => describe_validation(errors),
        _ => error.to_string(),
    }
}

fn describe_validation(errors: &ValidationErrors) -> String {
    let mut out = String::from("Please fix the following fields:");
    for (field, issues) in errors.iter() {
        for issue in issues {
            out.push_str(&format!("\n  {field}: {issue}"));
        }
    }
    out
}

async fn execute(client: &HrmClient, command: Command) -> CliResult {
    match command {
        Command::Login { email, password } => {
            client.auth.login(&Credentials::new(email, password)).await?;
        }
        Command::Logout => client.auth.logout().await?,
        Command::Whoami => match client.tokens.current_user() {
            Some(user) => {
                let role = user.role.map_or_else(|| "-".to_string(), |r| format!("{r:?}"));
                println!(
                    "{} <{}> role: {role}",
                    user.display_name(),
                    user.email.as_deref().unwrap_or("-")
                );
            }
            None => println!("Not signed in."),
        },
        Command::Register {
            email,
            password,
            confirm_password,
            organization,
            accept_terms,
        } => {
            let form = RegistrationForm {
                email,
                password,
                confirm_password,
                organization_name: organization,
                accept_terms,
            };
            client.auth.register(&form).await?;
        }
        Command::ResendOtp { email } => {
            client.auth.request_otp(&email).await?;
        }
        Command::VerifyOtp { otp } => {
            client.auth.verify_otp(&otp).await?;
        }
        Command::ResetPassword {
            email,
            new_password,
        } => {
            let form = PasswordResetForm {
                email,
                new_password,
            };
            client.auth.reset_password(&form).await?;
        }
        Command::Branch { command } => branch(client, command).await?,
        Command::Department { command } => department(client, command).await?,
    }
    Ok(())
}

async fn branch(client: &HrmClient, command: BranchCommand) -> CliResult {
    let service = &client.branches;
    match command {
        BranchCommand::List(args) => {
            let rows = service.list().await?;
            print_page(rows, &args, |b: &Branch| {
                format!(
                    "{:>5}  {:<30}  {:<20}  {:<25}  {}",
                    b.id, b.branch_name, b.province, b.email, b.phone_number
                )
            });
        }
        BranchCommand::Create(fields) => {
            let existing = service.list().await?;
            let mut form = BranchForm::default();
            fields.apply(&mut form);
            service.create(&form, &existing).await?;
        }
        BranchCommand::Update { id, fields } => {
            let existing = service.list().await?;
            let current = existing
                .iter()
                .find(|b| b.id == id)
                .ok_or_else(|| format!("no branch with id {id}"))?;
            let mut form = BranchForm::from_branch(current);
            fields.apply(&mut form);
            service.update(id, &form, &existing).await?;
        }
        BranchCommand::Delete { ids } => service.delete(ids).await?,
    }
    Ok(())
}

async fn department(client: &HrmClient, command: DepartmentCommand) -> CliResult {
    let service = &client.departments;
    match command {
        DepartmentCommand::List(args) => {
            let rows = service.list().await?;
            print_page(rows, &args, |d: &Department| {
                let branch = d.branch_id.map_or_else(|| "-".to_string(), |id| id.to_string());
                format!(
                    "{:>5}  {:<30}  level {:<3}  branch {branch}",
                    d.id, d.department_name, d.level
                )
            });
        }
        DepartmentCommand::Create(fields) => service.create(&fields.into()).await?,
        DepartmentCommand::Update { id, fields } => service.update(id, &fields.into()).await?,
        DepartmentCommand::Delete { ids } => service.delete(ids).await?,
    }
    Ok(())
}

fn print_page<T: Searchable>(rows: Vec<T>, args: &ListArgs, render: impl Fn(&T) -> String) {
    let mut view = ListView::new(rows);
    view.set_page_size(args.page_size);
    view.search(args.search.as_str());
    view.go_to_page(args.page.saturating_sub(1));

    for row in view.visible() {
        println!("{}", render(row));
    }
    println!(
        "page {}/{} ({} matching)",
        view.page() + 1,
        view.page_count(),
        view.filtered_count()
    );
}
