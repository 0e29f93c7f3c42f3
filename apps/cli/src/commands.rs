//! `bloodbank` subcommands and their plain-text rendering.

use std::sync::Arc;

use auth::{AccountService, NewUser};
use blood_store::BloodStore;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand};
use entities::{BloodRequest, Gender, Seriousness, User, UserRole};
use matching::{
    dashboard::{donation_details, user_summary, Dashboard},
    find_compatible_requests, is_donor_eligible,
    requests::sort_by_urgency,
    DonorProfile, Eligibility, FulfillmentService, NewBloodRequest, RequestFilter,
    RequestService,
};
use uuid::Uuid;

use crate::error::{CliError, CliResult};

#[derive(Subcommand)]
pub enum Command {
    /// Register a new account and log in
    Signup(SignupArgs),
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user and their activity
    Whoami,
    /// Post a blood request (receivers)
    Request(RequestArgs),
    /// List blood requests
    Requests {
        #[arg(long, value_parser = parse_filter, default_value = "all")]
        filter: RequestFilter,
        /// Only blood types containing this text, e.g. `b` or `o-`
        #[arg(long)]
        blood_type: Option<String>,
        /// Most urgent first
        #[arg(long, default_value_t = false)]
        by_urgency: bool,
    },
    /// Check whether you can donate today (donors)
    Eligibility,
    /// Open requests you can donate to (donors)
    Matches,
    /// Donate one unit towards a request (donors)
    Donate {
        #[arg(long)]
        request: Uuid,
    },
    /// List your donations (donors)
    Donations,
    /// Shared statistics, urgent requests and recent activity
    Dashboard,
}

#[derive(Args)]
pub struct SignupArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
    #[arg(long)]
    age: u32,
    #[arg(long)]
    location: String,
    #[arg(long)]
    blood_type: String,
    /// donor or receiver
    #[arg(long, value_parser = parse_role)]
    role: UserRole,
    /// male, female or other
    #[arg(long, value_parser = parse_gender, default_value = "male")]
    gender: Gender,
    /// Date of your previous donation (YYYY-MM-DD)
    #[arg(long)]
    last_donated: Option<NaiveDate>,
    #[arg(long, default_value_t = false)]
    drunk: bool,
    #[arg(long, default_value_t = false)]
    smoker: bool,
}

#[derive(Args)]
pub struct RequestArgs {
    #[arg(long)]
    blood_type: String,
    /// Hospital area or city
    #[arg(long)]
    area: String,
    #[arg(long, default_value_t = 1)]
    units: u32,
    /// low, moderate or high
    #[arg(long, value_parser = parse_seriousness, default_value = "moderate")]
    seriousness: Seriousness,
}

fn parse_role(s: &str) -> Result<UserRole, String> {
    UserRole::parse(s).ok_or_else(|| format!("unknown role `{s}` (donor, receiver)"))
}

fn parse_gender(s: &str) -> Result<Gender, String> {
    Gender::parse(s).ok_or_else(|| format!("unknown gender `{s}` (male, female, other)"))
}

fn parse_seriousness(s: &str) -> Result<Seriousness, String> {
    Seriousness::parse(s)
        .ok_or_else(|| format!("unknown seriousness `{s}` (low, moderate, high)"))
}

fn parse_filter(s: &str) -> Result<RequestFilter, String> {
    RequestFilter::parse(s).ok_or_else(|| format!("unknown filter `{s}` (all, open, mine)"))
}

/// Runs one command against `store` and returns the text to print.
pub async fn execute<S: BloodStore>(
    command: Command,
    store: Arc<S>,
    now: DateTime<Utc>,
) -> CliResult<String> {
    let accounts = AccountService::new(Arc::clone(&store));

    match command {
        Command::Signup(args) => {
            let role = args.role;
            let new = NewUser {
                name: args.name,
                email: args.email,
                password: args.password,
                confirm_password: args.confirm_password,
                age: args.age,
                location: args.location,
                blood_type: args.blood_type,
                role,
                gender: args.gender,
                last_donated_date: args
                    .last_donated
                    .map(|date| date.and_time(NaiveTime::MIN).and_utc()),
                is_drunk: args.drunk,
                is_smoker: args.smoker,
            };
            let user = accounts.signup_at(new, now).await?;
            Ok(format!(
                "Welcome, {}! Registered as {} ({}).",
                user.name,
                role_label(user.role),
                user.blood_type
            ))
        }
        Command::Login { email, password } => {
            let user = accounts.login(&email, &password).await?;
            Ok(format!("Logged in as {} <{}>.", user.name, user.email))
        }
        Command::Logout => {
            accounts.logout().await?;
            Ok("Logged out.".to_string())
        }
        Command::Whoami => {
            let user = require_user(&accounts).await?;
            let snapshot = store.snapshot().await?;
            let summary = user_summary(&user, &snapshot.requests, &snapshot.donations, now);

            let mut lines = vec![
                format!("{} <{}>", user.name, user.email),
                format!(
                    "{} | {} | age {} | {}",
                    role_label(user.role),
                    user.blood_type,
                    user.age,
                    user.location
                ),
            ];
            if let Some(eligibility) = &summary.eligibility {
                lines.push(eligibility_line(eligibility));
            }
            if user.is_receiver() {
                lines.push(format!("Requests posted: {}", summary.requests.len()));
            } else {
                lines.push(format!("Donations made: {}", summary.donations.len()));
            }
            Ok(lines.join("\n"))
        }
        Command::Request(args) => {
            let user = require_role(&accounts, UserRole::Receiver).await?;
            let new = NewBloodRequest {
                blood_type: args.blood_type,
                hospital_area: args.area,
                units_needed: args.units,
                seriousness: args.seriousness,
            };
            let request = RequestService::new(store).create_request(user.id, new).await?;
            Ok(format!("Request posted.\n{}", request_line(&request)))
        }
        Command::Requests {
            filter,
            blood_type,
            by_urgency,
        } => {
            let viewer_id = match filter {
                RequestFilter::Mine => require_user(&accounts).await?.id,
                _ => accounts.current_user().await?.map_or_else(Uuid::nil, |u| u.id),
            };
            let requests = RequestService::new(store)
                .list_requests(filter, viewer_id, blood_type.as_deref())
                .await?;

            let mut listed: Vec<&BloodRequest> = requests.iter().collect();
            if by_urgency {
                sort_by_urgency(&mut listed);
            }
            Ok(render_requests(&listed))
        }
        Command::Eligibility => {
            let user = require_role(&accounts, UserRole::Donor).await?;
            Ok(eligibility_line(&is_donor_eligible(
                &DonorProfile::from(&user),
                now,
            )))
        }
        Command::Matches => {
            let user = require_role(&accounts, UserRole::Donor).await?;
            let requests = store.load_requests().await?;
            let matches = find_compatible_requests(&user, &requests);

            let mut lines = vec![eligibility_line(&is_donor_eligible(
                &DonorProfile::from(&user),
                now,
            ))];
            if matches.is_empty() {
                lines.push(format!(
                    "No open requests in {} match blood type {}.",
                    user.location, user.blood_type
                ));
            } else {
                lines.push(render_requests(&matches));
            }
            Ok(lines.join("\n"))
        }
        Command::Donate { request } => {
            let user = require_role(&accounts, UserRole::Donor).await?;
            let donation = FulfillmentService::new(Arc::clone(&store))
                .record_donation_at(user.id, request, now)
                .await?;

            let remaining = store
                .snapshot()
                .await?
                .request(request)
                .map(|r| r.units_needed)
                .unwrap_or_default();
            Ok(if remaining == 0 {
                format!("Donation {} recorded. Request fulfilled.", donation.id)
            } else {
                format!(
                    "Donation {} recorded. {remaining} unit(s) still needed.",
                    donation.id
                )
            })
        }
        Command::Donations => {
            let user = require_role(&accounts, UserRole::Donor).await?;
            let snapshot = store.snapshot().await?;
            let summary = user_summary(&user, &snapshot.requests, &snapshot.donations, now);

            if summary.donations.is_empty() {
                return Ok("No donations yet.".to_string());
            }
            let mut lines = vec![format!("Total donations: {}", summary.donations.len())];
            let details = donation_details(&snapshot.users, &snapshot.requests, &summary.donations);
            for details in &details {
                lines.push(format!(
                    "{}  {} blood donation to {}  {} unit(s)  {}",
                    details.donation.donation_date.format("%Y-%m-%d"),
                    details.blood_type,
                    details.requester_name,
                    details.donation.units_contributed,
                    details.location
                ));
            }
            Ok(lines.join("\n"))
        }
        Command::Dashboard => {
            let dashboard = Dashboard::load(store.as_ref()).await?;
            let stats = dashboard.stats;

            let mut lines = vec![
                format!("Total donations:      {}", stats.total_donations),
                format!("Open requests:        {}", stats.open_requests),
                format!("Registered donors:    {}", stats.registered_donors),
                format!("Registered receivers: {}", stats.registered_receivers),
                format!("Total users:          {}", stats.total_users),
                String::new(),
                "Urgent requests:".to_string(),
            ];
            if dashboard.urgent_requests.is_empty() {
                lines.push("  none".to_string());
            }
            for request in &dashboard.urgent_requests {
                lines.push(format!("  {}", request_line(request)));
            }
            lines.push(String::new());
            lines.push("Recent activity:".to_string());
            if dashboard.recent_activity.is_empty() {
                lines.push("  none".to_string());
            }
            for entry in &dashboard.recent_activity {
                lines.push(format!(
                    "  {} donated {} ({}) on {}",
                    entry.donor_name,
                    entry.blood_type,
                    entry.donation.units_contributed,
                    entry.donation.donation_date.format("%Y-%m-%d")
                ));
            }
            Ok(lines.join("\n"))
        }
    }
}

async fn require_user<S: BloodStore>(accounts: &AccountService<S>) -> CliResult<User> {
    accounts.current_user().await?.ok_or(CliError::NotLoggedIn)
}

async fn require_role<S: BloodStore>(
    accounts: &AccountService<S>,
    role: UserRole,
) -> CliResult<User> {
    let user = require_user(accounts).await?;
    if user.role != role {
        return Err(CliError::WrongRole(role_label(role)));
    }
    Ok(user)
}

fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Donor => "donor",
        UserRole::Receiver => "receiver",
    }
}

fn eligibility_line(eligibility: &Eligibility) -> String {
    if eligibility.eligible {
        return "Eligible to donate.".to_string();
    }
    let reason = eligibility
        .reason
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    match eligibility.days_until_eligible {
        Some(days) => format!("Not eligible: {reason} ({days} day(s) left)."),
        None => format!("Not eligible: {reason}."),
    }
}

fn request_line(request: &BloodRequest) -> String {
    format!(
        "{}  {:<3}  {} unit(s)  {:<8}  {:<8}  {}",
        request.id,
        request.blood_type.as_str(),
        request.units_needed,
        request.seriousness.as_str(),
        request.status.as_str(),
        request.hospital_area
    )
}

fn render_requests(requests: &[&BloodRequest]) -> String {
    if requests.is_empty() {
        return "No requests.".to_string();
    }
    requests
        .iter()
        .map(|r| request_line(r))
        .collect::<Vec<_>>()
        .join("\n")
}
