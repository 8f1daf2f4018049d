use carebook_server::config::AppConfig;
use carebook_server::seed::{self, SeedPlan};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    carebook_server::telemetry::init_telemetry("carebook-seed");

    let config = AppConfig::from_env();
    let plan = SeedPlan::default();
    let mut rng = StdRng::from_entropy();

    let code = match seed::seed_database(&config.database_url, &plan, &mut rng).await {
        Ok(report) => {
            tracing::info!(
                users = report.users.len(),
                doctors = report.doctors.len(),
                notifications = report.notifications.len(),
                appointments = report.appointments.len(),
                "Database seeding complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Seeding error");
            ExitCode::FAILURE
        }
    };

    carebook_server::telemetry::shutdown_telemetry();
    code
}
