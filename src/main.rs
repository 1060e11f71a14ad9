//! MediReminder CLI
//!
//! Command-line client for the MediReminder API:
//! - Log in and manage the local session
//! - Manage medications, caregivers and alarms
//! - Watch for due alarms and acknowledge them
//! - Show the medication calendar

use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medireminder::alarm::{
    AckOutcome, AlarmApi, AlarmController, AlarmPoller, AudioAlerter, AudioOutput, Navigator,
    PollOutcome, SilentOutput, SystemClock, TerminalBell, View,
};
use medireminder::api::{
    AlarmStatus, AlarmUpdate, ApiClient, CaregiverUpdate, MedicationUpdate, RecordId,
};
use medireminder::calendar::{month_name, CalendarState, CellKind, WEEKDAY_LABELS};
use medireminder::config::{generate_default_config, Config, LoggingConfig};
use medireminder::forms::{
    parse_date, validate_time, AlarmForm, CaregiverForm, LoginForm, MedicationForm, SignupForm,
};
use medireminder::render::{
    format_time_12h, render_caregiver_list, render_medication_list, render_profile, Container,
};
use medireminder::session::{FileStore, Session};

#[derive(Parser)]
#[command(name = "medireminder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Medication reminders from the command line")]
#[command(long_about = "MediReminder keeps track of your medications and caregivers,\nand rings an alarm when a dose is due.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API server URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Html,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with an email address or phone number
    Login {
        identifier: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and log in
    Signup {
        identifier: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        username: String,
        #[arg(long)]
        full_name: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show API and session status
    Status,

    /// Manage medications
    Medicines {
        #[command(subcommand)]
        command: MedicineCommand,
    },

    /// Manage caregivers
    Caregivers {
        #[command(subcommand)]
        command: CaregiverCommand,
    },

    /// Manage alarms
    Alarms {
        #[command(subcommand)]
        command: AlarmCommand,
    },

    /// Poll for due alarms and ring until acknowledged
    Watch,

    /// Poll once for a due alarm
    Check,

    /// Mark the current alarm as taken
    Take,

    /// Snooze the current alarm
    Snooze,

    /// Show the medication calendar
    Calendar {
        /// Month to show (YYYY-MM, default: this month)
        #[arg(short, long)]
        month: Option<String>,
        /// Day of the month to select
        #[arg(short, long)]
        day: Option<u32>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum MedicineCommand {
    List,
    Add {
        name: String,
        #[arg(short, long)]
        dosage: String,
        #[arg(long, default_value = "Once daily")]
        frequency: String,
        /// Time of day (HH:MM, 24-hour)
        #[arg(short, long)]
        time: String,
        #[arg(short, long)]
        instructions: Option<String>,
        /// Start date (YYYY-MM-DD, default: today)
        #[arg(long)]
        start_date: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        dosage: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long)]
        start_date: Option<String>,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CaregiverCommand {
    List,
    Add {
        name: String,
        #[arg(short, long)]
        relation: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(long)]
        primary: bool,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        relation: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        primary: Option<bool>,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AlarmCommand {
    List,
    Add {
        medication_name: String,
        /// Time of day (HH:MM, 24-hour)
        #[arg(short, long)]
        time: String,
        #[arg(short, long)]
        dose: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        medication_name: Option<String>,
        #[arg(long)]
        dose: Option<String>,
        #[arg(long)]
        time: Option<String>,
        /// upcoming, taken, snoozed or missed
        #[arg(long)]
        status: Option<String>,
    },
    Remove {
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_tracing(&config.logging);

    let app = App::new(config, cli.format)?;
    app.run(cli.command).await
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("medireminder={}", logging.level)));

    // Logs go to stderr so command output stays pipeable
    let (pretty, json) = if logging.format == "json" {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

struct App {
    config: Config,
    format: OutputFormat,
    session: Session,
    client: ApiClient,
}

impl App {
    fn new(config: Config, format: OutputFormat) -> anyhow::Result<Self> {
        let store = FileStore::open(config.session.session_file())
            .with_context(|| format!("Cannot open session in {}", config.session.data_dir))?;
        let session = Session::new(Arc::new(store));

        let mut client = ApiClient::new(&config.api)?;
        client.set_token(session.token()?);

        Ok(Self {
            config,
            format,
            session,
            client,
        })
    }

    fn require_login(&self) -> anyhow::Result<()> {
        if !self.session.is_authenticated() {
            bail!("Not logged in. Run `medireminder login` first.");
        }
        Ok(())
    }

    async fn run(&self, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Login {
                identifier,
                password,
            } => {
                let request = LoginForm {
                    identifier,
                    password,
                }
                .validate()?;
                let auth = self.client.login(&request).await?;
                self.session.establish(&auth)?;
                println!("Welcome back, {}!", auth.user.display_name());
            }

            Commands::Signup {
                identifier,
                password,
                username,
                full_name,
                dob,
            } => {
                let request = SignupForm {
                    identifier,
                    password,
                    full_name,
                    username,
                    dob,
                }
                .validate()?;
                let auth = self.client.signup(&request).await?;
                self.session.establish(&auth)?;
                println!("Account created. Welcome, {}!", auth.user.display_name());
            }

            Commands::Logout => {
                self.session.clear()?;
                println!("Logged out.");
            }

            Commands::Whoami => {
                self.require_login()?;
                let user = self.client.me().await?;
                self.session.set_user(&user)?;

                match self.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&user)?),
                    OutputFormat::Html => println!("{}", render_profile(&user).to_html()),
                    OutputFormat::Table => {
                        println!("{}", user.display_name());
                        if let Some(email) = &user.email {
                            println!("  Email:  {}", email);
                        }
                        if let Some(phone) = &user.phone {
                            println!("  Phone:  {}", phone);
                        }
                        if let Some(joined) = user.joined() {
                            println!("  Member since {}", joined);
                        }
                    }
                }
            }

            Commands::Status => self.status().await?,

            Commands::Medicines { command } => self.medicines(command).await?,
            Commands::Caregivers { command } => self.caregivers(command).await?,
            Commands::Alarms { command } => self.alarms(command).await?,

            Commands::Watch => self.watch().await?,

            Commands::Check => {
                self.require_login()?;
                let controller = self.controller(Arc::new(SilentOutput));
                let poller = AlarmPoller::new(
                    self.alarm_api(),
                    Arc::new(SystemClock),
                    controller.clone(),
                    self.config.alarm.poll_interval(),
                );

                match poller.poll_once().await {
                    PollOutcome::Triggered(alarm) => {
                        controller.alerter().stop();
                        println!(
                            "Due now: {} at {}. Run `medireminder take` or `medireminder snooze`.",
                            alarm.medication_name,
                            format_time_12h(&alarm.scheduled_time)
                        );
                    }
                    PollOutcome::Failed(message) => bail!("Alarm check failed: {}", message),
                    _ => println!("No dose due right now."),
                }
            }

            Commands::Take => {
                let outcome = self.controller(Arc::new(SilentOutput)).take().await;
                print_ack(outcome);
            }

            Commands::Snooze => {
                let outcome = self.controller(Arc::new(SilentOutput)).snooze().await;
                print_ack(outcome);
            }

            Commands::Calendar { month, day } => self.calendar(month, day)?,

            Commands::Config { output } => {
                let config = generate_default_config();
                if let Some(path) = output {
                    std::fs::write(&path, config)?;
                    println!("Config written to {:?}", path);
                } else {
                    println!("{}", config);
                }
            }
        }

        Ok(())
    }

    async fn status(&self) -> anyhow::Result<()> {
        println!("MediReminder v{}", env!("CARGO_PKG_VERSION"));
        println!();

        match self.client.health().await {
            Ok(health) => println!("API: {} ({})", self.client.base_url(), health.message),
            Err(e) => println!("API: {} unreachable ({})", self.client.base_url(), e),
        }

        match self.session.user()? {
            Some(user) if self.session.is_authenticated() => {
                println!("Session: logged in as {}", user.display_name())
            }
            _ if self.session.is_authenticated() => println!("Session: logged in"),
            _ => println!("Session: not logged in"),
        }

        if let Some(alarm) = self.session.current_alarm()? {
            println!(
                "Last alarm: {} at {}",
                alarm.medication_name,
                format_time_12h(&alarm.scheduled_time)
            );
        }

        Ok(())
    }

    async fn medicines(&self, command: MedicineCommand) -> anyhow::Result<()> {
        self.require_login()?;

        match command {
            MedicineCommand::List => {
                let meds = self.client.list_medicines().await?;
                match self.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&meds)?),
                    OutputFormat::Html => {
                        let mut container = Container::new();
                        render_medication_list(&mut container, &meds);
                        println!("{}", container.to_html());
                    }
                    OutputFormat::Table if meds.is_empty() => {
                        println!("No medications yet.");
                        println!();
                        println!("Add your first one with:");
                        println!("  medireminder medicines add Metformin --dosage 500mg --time 08:00");
                    }
                    OutputFormat::Table => {
                        println!(
                            "{:<8} {:<20} {:<10} {:<16} {:<10} {}",
                            "ID", "Name", "Dosage", "Frequency", "Time", "Status"
                        );
                        println!("{}", "-".repeat(76));
                        for med in meds {
                            println!(
                                "{:<8} {:<20} {:<10} {:<16} {:<10} {}",
                                med.id.to_string(),
                                med.name,
                                med.dosage,
                                med.frequency,
                                format_time_12h(&med.time),
                                if med.active { "Active" } else { "Paused" }
                            );
                        }
                    }
                }
            }

            MedicineCommand::Add {
                name,
                dosage,
                frequency,
                time,
                instructions,
                start_date,
            } => {
                let form = MedicationForm {
                    name,
                    dosage,
                    frequency,
                    time,
                    instructions,
                    start_date: start_date.as_deref().map(parse_date).transpose()?,
                };
                let med = self
                    .client
                    .create_medicine(&form.validate(Local::now().date_naive())?)
                    .await?;
                println!("Added {} ({}) at {}", med.name, med.id, format_time_12h(&med.time));
            }

            MedicineCommand::Update {
                id,
                name,
                dosage,
                frequency,
                time,
                instructions,
                active,
                start_date,
            } => {
                let update = MedicationUpdate {
                    name,
                    dosage,
                    frequency,
                    time: time.as_deref().map(validate_time).transpose()?,
                    instructions,
                    active,
                    start_date: start_date.as_deref().map(parse_date).transpose()?,
                };
                if update.is_empty() {
                    bail!("Nothing to update");
                }
                let med = self.client.update_medicine(&RecordId::from(id.as_str()), &update).await?;
                println!("Updated {} ({})", med.name, med.id);
            }

            MedicineCommand::Remove { id } => {
                self.client.delete_medicine(&RecordId::from(id.as_str())).await?;
                println!("Removed medication {}", id);
            }
        }

        Ok(())
    }

    async fn caregivers(&self, command: CaregiverCommand) -> anyhow::Result<()> {
        self.require_login()?;

        match command {
            CaregiverCommand::List => {
                let caregivers = self.client.list_caregivers().await?;
                match self.format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&caregivers)?)
                    }
                    OutputFormat::Html => {
                        let mut container = Container::new();
                        render_caregiver_list(&mut container, &caregivers);
                        println!("{}", container.to_html());
                    }
                    OutputFormat::Table if caregivers.is_empty() => {
                        println!("No caregivers yet.");
                    }
                    OutputFormat::Table => {
                        println!(
                            "{:<8} {:<20} {:<12} {:<16} {:<24} {}",
                            "ID", "Name", "Relation", "Phone", "Email", ""
                        );
                        println!("{}", "-".repeat(90));
                        for c in caregivers {
                            println!(
                                "{:<8} {:<20} {:<12} {:<16} {:<24} {}",
                                c.id.to_string(),
                                c.name,
                                c.relation.as_deref().unwrap_or("Caregiver"),
                                c.phone.as_deref().unwrap_or("-"),
                                c.email.as_deref().unwrap_or("-"),
                                if c.is_primary { "Primary" } else { "" }
                            );
                        }
                    }
                }
            }

            CaregiverCommand::Add {
                name,
                relation,
                phone,
                email,
                primary,
            } => {
                let form = CaregiverForm {
                    name,
                    relation,
                    phone,
                    email,
                    is_primary: primary,
                };
                let caregiver = self.client.create_caregiver(&form.validate()?).await?;
                println!("Added caregiver {} ({})", caregiver.name, caregiver.id);
            }

            CaregiverCommand::Update {
                id,
                name,
                relation,
                phone,
                email,
                primary,
            } => {
                let update = CaregiverUpdate {
                    name,
                    relation,
                    phone,
                    email,
                    is_primary: primary,
                };
                if update.is_empty() {
                    bail!("Nothing to update");
                }
                let caregiver = self
                    .client
                    .update_caregiver(&RecordId::from(id.as_str()), &update)
                    .await?;
                println!("Updated caregiver {} ({})", caregiver.name, caregiver.id);
            }

            CaregiverCommand::Remove { id } => {
                self.client.delete_caregiver(&RecordId::from(id.as_str())).await?;
                println!("Removed caregiver {}", id);
            }
        }

        Ok(())
    }

    async fn alarms(&self, command: AlarmCommand) -> anyhow::Result<()> {
        self.require_login()?;

        match command {
            AlarmCommand::List => {
                let alarms = self.client.list_alarms().await?;
                match self.format {
                    OutputFormat::Json | OutputFormat::Html => {
                        println!("{}", serde_json::to_string_pretty(&alarms)?)
                    }
                    OutputFormat::Table if alarms.is_empty() => println!("No alarms scheduled."),
                    OutputFormat::Table => {
                        println!(
                            "{:<8} {:<20} {:<12} {:<10} {}",
                            "ID", "Medication", "Dose", "Time", "Status"
                        );
                        println!("{}", "-".repeat(64));
                        for alarm in alarms {
                            println!(
                                "{:<8} {:<20} {:<12} {:<10} {}",
                                alarm.id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                                alarm.medication_name,
                                alarm.dose.as_deref().unwrap_or("-"),
                                format_time_12h(&alarm.scheduled_time),
                                alarm.status.map(|s| s.as_str()).unwrap_or("upcoming")
                            );
                        }
                    }
                }
            }

            AlarmCommand::Add {
                medication_name,
                time,
                dose,
            } => {
                let form = AlarmForm {
                    medication_name,
                    dose,
                    scheduled_time: time,
                };
                let alarm = self.client.create_alarm(&form.validate()?).await?;
                println!(
                    "Alarm set for {} at {}",
                    alarm.medication_name,
                    format_time_12h(&alarm.scheduled_time)
                );
            }

            AlarmCommand::Update {
                id,
                medication_name,
                dose,
                time,
                status,
            } => {
                let update = AlarmUpdate {
                    medication_name,
                    dose,
                    scheduled_time: time.as_deref().map(validate_time).transpose()?,
                    status: status.as_deref().map(parse_status).transpose()?,
                };
                if update.is_empty() {
                    bail!("Nothing to update");
                }
                let alarm = self.client.update_alarm(&RecordId::from(id.as_str()), &update).await?;
                println!("Updated alarm for {}", alarm.medication_name);
            }

            AlarmCommand::Remove { id } => {
                self.client.delete_alarm(&RecordId::from(id.as_str())).await?;
                println!("Removed alarm {}", id);
            }
        }

        Ok(())
    }

    fn alarm_api(&self) -> Arc<dyn AlarmApi> {
        Arc::new(self.client.clone())
    }

    fn controller(&self, output: Arc<dyn AudioOutput>) -> Arc<AlarmController> {
        let alerter = AudioAlerter::with_output(
            self.config.alarm.beep_interval(),
            self.config.alarm.sample_rate,
            output,
        );
        Arc::new(AlarmController::new(
            self.alarm_api(),
            self.session.clone(),
            alerter,
            Arc::new(TerminalNavigator),
        ))
    }

    async fn watch(&self) -> anyhow::Result<()> {
        self.require_login()?;

        let output: Arc<dyn AudioOutput> = if self.config.alarm.terminal_bell {
            Arc::new(TerminalBell)
        } else {
            Arc::new(SilentOutput)
        };
        let controller = self.controller(output);
        let poller = Arc::new(AlarmPoller::new(
            self.alarm_api(),
            Arc::new(SystemClock),
            controller.clone(),
            self.config.alarm.poll_interval(),
        ));
        let handle = poller.start();

        println!(
            "Watching for due doses every {}s. Type 't' to take, 's' to snooze, 'q' to quit.",
            self.config.alarm.poll_interval().as_secs()
        );

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line?.as_deref().map(str::trim) {
                        Some("t") | Some("take") => print_ack(controller.take().await),
                        Some("s") | Some("snooze") => print_ack(controller.snooze().await),
                        Some("q") | Some("quit") | None => break,
                        Some("") => {}
                        Some(other) => println!("Unknown input {:?}. Use t, s or q.", other),
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        controller.alerter().stop();
        handle.stop().await;
        println!("Stopped watching.");
        Ok(())
    }

    fn calendar(&self, month: Option<String>, day: Option<u32>) -> anyhow::Result<()> {
        let today = Local::now().date_naive();
        let mut state = CalendarState::new(today);

        if let Some(month) = month {
            let (year, month) = parse_month(&month)?;
            state = state
                .with_month(year, month)
                .with_context(|| format!("Invalid month {}-{}", year, month))?;
            if day.is_none() {
                state.select_day(1);
            }
        }
        if let Some(day) = day {
            if !state.select_day(day) {
                bail!(
                    "{} {} has no day {}",
                    month_name(state.month()),
                    state.year(),
                    day
                );
            }
        }

        let grid = state
            .grid(today)
            .context("Cannot build calendar for that month")?;
        let schedule = state.schedule(today);

        match self.format {
            OutputFormat::Html => println!("{}", state.render(today).to_html()),
            OutputFormat::Json => {
                let missed: Vec<u32> = grid
                    .current_days()
                    .filter(|c| c.has_missed_dose)
                    .map(|c| c.day)
                    .collect();
                let body = serde_json::json!({
                    "month": grid.label(),
                    "selected": state.selected(),
                    "missed_days": missed,
                    "schedule": schedule,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
            OutputFormat::Table => {
                println!("{:^35}", grid.label());
                println!(
                    "{}",
                    WEEKDAY_LABELS
                        .iter()
                        .map(|d| format!("{:>4} ", d))
                        .collect::<String>()
                );
                for week in grid.weeks() {
                    let row: String = week
                        .iter()
                        .map(|cell| match cell.kind {
                            CellKind::Padding => "     ".to_string(),
                            CellKind::Current => {
                                let marker = if cell.is_selected {
                                    '*'
                                } else if cell.is_today {
                                    '<'
                                } else if cell.has_missed_dose {
                                    '!'
                                } else {
                                    ' '
                                };
                                format!("{:>4}{}", cell.day, marker)
                            }
                        })
                        .collect();
                    println!("{}", row.trim_end());
                }
                println!();
                println!("* selected  < today  ! missed dose");
                println!();

                println!("{}", state.selected().format("%A, %B %-d"));
                for entry in schedule {
                    println!(
                        "  {:<9} {:<14} {:<8} {}",
                        format_time_12h(entry.time),
                        entry.name,
                        entry.dosage,
                        entry.status.label()
                    );
                }
            }
        }

        Ok(())
    }
}

/// Prints alarm screens to the terminal
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, view: View) {
        match view {
            View::Alert(alarm) => {
                println!();
                println!("*** Time to take your medication ***");
                match &alarm.dose {
                    Some(dose) => println!("  {} ({})", alarm.medication_name, dose),
                    None => println!("  {}", alarm.medication_name),
                }
                println!("  Scheduled for {}", format_time_12h(&alarm.scheduled_time));
                println!("Type 't' when taken or 's' to snooze.");
            }
            View::Dashboard => println!("Back to dashboard."),
        }
    }
}

fn print_ack(outcome: AckOutcome) {
    match outcome {
        AckOutcome::Updated(AlarmStatus::Taken) => println!("Dose marked as taken."),
        AckOutcome::Updated(AlarmStatus::Snoozed) => println!("Alarm snoozed."),
        AckOutcome::Updated(status) => println!("Alarm marked as {}.", status),
        AckOutcome::UpdateFailed(_) => println!("Alarm stopped."),
        AckOutcome::Skipped(reason) => println!("No alarm to acknowledge ({:?}).", reason),
    }
}

fn parse_status(value: &str) -> anyhow::Result<AlarmStatus> {
    match value.trim().to_lowercase().as_str() {
        "upcoming" => Ok(AlarmStatus::Upcoming),
        "taken" => Ok(AlarmStatus::Taken),
        "snoozed" => Ok(AlarmStatus::Snoozed),
        "missed" => Ok(AlarmStatus::Missed),
        other => bail!("Unknown alarm status: {}", other),
    }
}

/// Parse "YYYY-MM"
fn parse_month(value: &str) -> anyhow::Result<(i32, u32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month {:?}, expected YYYY-MM", value))?;
    Ok((date.year(), date.month()))
}
