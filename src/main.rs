use std::io;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dialoguer::Password;
use dotenv::dotenv;
use log::info;

use employee_directory::client::{
    DirectoryController, EmployeeApi, EmployeeFilter, FileSessionStorage, HttpApi, StatusFilter,
};
use employee_directory::config::{ClientConfig, ServerConfig};
use employee_directory::models::employee::{EmployeeUpdate, Gender};
use employee_directory::ui::form::capture_image;
use employee_directory::ui::table::{render_details, status_label};
use employee_directory::ui::{modal, render_dashboard, EmployeeForm, LoginForm};
use employee_directory::{db, handlers};

type Controller = DirectoryController<HttpApi, FileSessionStorage>;

#[derive(Parser)]
#[command(name = "employee-directory", version, about = "Employee directory admin tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,
    /// Start a session (any non-empty username and password)
    Login {
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    /// Print the current session
    Whoami,
    /// Show the dashboard, optionally filtered
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        status: Option<StatusFilter>,
    },
    /// Show one employee by EMP code or record id
    Show { employee: String },
    Add(FormArgs),
    Edit {
        employee: String,
        #[command(flatten)]
        fields: FormArgs,
    },
    Delete {
        employee: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Flip an employee between active and inactive
    Toggle { employee: String },
    /// Fill an empty store with sample employees
    Seed,
}

#[derive(Args)]
struct FormArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    gender: Option<Gender>,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    dob: Option<NaiveDate>,
    #[arg(long)]
    state: Option<String>,
    /// Local image file (max 2MB) or image URL
    #[arg(long)]
    image: Option<String>,
    #[arg(long, conflicts_with = "inactive")]
    active: bool,
    #[arg(long)]
    inactive: bool,
}

impl Command {
    /// Session-only commands skip the initial fetch.
    fn reads_list(&self) -> bool {
        !matches!(self, Command::Logout | Command::Whoami)
    }
}

impl FormArgs {
    fn apply(self, form: &mut EmployeeForm) -> Result<(), String> {
        if let Some(name) = self.name {
            form.full_name = name;
        }
        if let Some(gender) = self.gender {
            form.gender = gender;
        }
        if self.dob.is_some() {
            form.date_of_birth = self.dob;
        }
        if let Some(state) = self.state {
            form.state = state;
        }
        if let Some(image) = self.image {
            form.profile_image = capture_image(&image).map_err(|err| err.to_string())?;
        }
        if self.active {
            form.is_active = true;
        }
        if self.inactive {
            form.is_active = false;
        }
        Ok(())
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => serve().await,
        command => run_client(command).await,
    }
}

async fn serve() -> io::Result<()> {
    let config = ServerConfig::from_env().map_err(io::Error::other)?;
    let store = db::create_store(&config).await.map_err(io::Error::other)?;

    info!("Starting server at {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::from(store.clone()))
            .configure(handlers::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}

fn exit_with(message: impl std::fmt::Display) -> io::Result<()> {
    eprintln!("{}", message);
    std::process::exit(1)
}

fn print_dashboard(controller: &Controller, filter: &EmployeeFilter) {
    let visible = controller.visible(filter);
    println!(
        "{}",
        render_dashboard(controller.username(), &controller.stats(), controller.is_loading(), &visible)
    );
}

async fn run_client(command: Command) -> io::Result<()> {
    let config = ClientConfig::from_env().map_err(io::Error::other)?;
    let api = HttpApi::new(config.api_url);
    let storage = FileSessionStorage::new(config.session_file);
    let mut controller = if command.reads_list() {
        DirectoryController::start(api, storage).await
    } else {
        DirectoryController::restore(api, storage)
    };

    if let Command::Login { username, password } = command {
        let password = match password {
            Some(password) => password,
            None => Password::new()
                .with_prompt("Password")
                .allow_empty_password(true)
                .interact()
                .map_err(io::Error::other)?,
        };
        if let Some(error) = LoginForm::new(username.as_str(), password.as_str()).error() {
            return exit_with(error);
        }
        controller.login(&username, &password).await;
        print_dashboard(&controller, &EmployeeFilter::default());
        return Ok(());
    }

    if !controller.is_authenticated() {
        return exit_with("Not logged in. Run `employee-directory login <username>` first.");
    }

    match command {
        Command::Logout => {
            controller.logout();
            println!("Logged out");
        }
        Command::Whoami => println!("{}", controller.username()),
        Command::List { search, gender, status } => {
            let filter = EmployeeFilter { search, gender, status };
            print_dashboard(&controller, &filter);
        }
        Command::Show { employee } => {
            let Some(id) = controller.find(&employee).map(|e| e.id) else {
                return exit_with("Employee not found");
            };
            match controller.api().get_employee(id).await {
                Ok(employee) => println!("{}", render_details(&employee)),
                Err(err) => return exit_with(err),
            }
        }
        Command::Add(fields) => {
            let mut form = EmployeeForm::default();
            if let Err(err) = fields.apply(&mut form) {
                return exit_with(err);
            }
            let payload = match form.submit() {
                Ok(payload) => payload,
                Err(errors) => return exit_with(errors),
            };
            match controller.add_employee(payload).await {
                Some(created) => println!("{}", render_details(&created)),
                None => return exit_with("Employee was not added"),
            }
        }
        Command::Edit { employee, fields } => {
            let Some(existing) = controller.find(&employee).cloned() else {
                return exit_with("Employee not found");
            };
            let mut form = EmployeeForm::from_employee(&existing);
            if let Err(err) = fields.apply(&mut form) {
                return exit_with(err);
            }
            let payload = match form.submit() {
                Ok(payload) => payload,
                Err(errors) => return exit_with(errors),
            };
            match controller.update_employee(existing.id, EmployeeUpdate::from(payload)).await {
                Some(updated) => println!("{}", render_details(&updated)),
                None => return exit_with("Employee was not updated"),
            }
        }
        Command::Delete { employee, yes } => {
            let Some(existing) = controller.find(&employee).cloned() else {
                return exit_with("Employee not found");
            };
            let confirmed = yes || modal::confirm_delete(&existing.full_name).map_err(io::Error::other)?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
            if controller.delete_employee(existing.id).await {
                println!("Deleted {}", existing.full_name);
            } else {
                return exit_with("Employee was not deleted");
            }
        }
        Command::Toggle { employee } => {
            let Some(id) = controller.find(&employee).map(|e| e.id) else {
                return exit_with("Employee not found");
            };
            match controller.toggle_status(id).await {
                Some(updated) => println!("{} is now {}", updated.full_name, status_label(updated.is_active)),
                None => return exit_with("Status was not changed"),
            }
        }
        Command::Seed => {
            match controller.api().seed().await {
                Ok(message) => println!("{}", message),
                Err(err) => return exit_with(err),
            }
            controller.refresh().await;
            print_dashboard(&controller, &EmployeeFilter::default());
        }
        Command::Serve | Command::Login { .. } => {}
    }

    Ok(())
}
