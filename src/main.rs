use clap::Parser;
use testrail_reporter::cli::commands::{cmd_report, cmd_submit};
use testrail_reporter::cli::config::{Cli, Commands, load_config, resolve_credentials};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let credentials = resolve_credentials(&cli, &config)?;

    match cli.command {
        Commands::Report {
            project_id,
            plan_id,
            serial_marker,
        } => {
            let project_id = project_id
                .or(config.report.project_id)
                .ok_or("Project id missing (use --project-id or the config file)")?;
            let plan_id = plan_id
                .or(config.report.plan_id)
                .ok_or("Plan id missing (use --plan-id or the config file)")?;
            let serial_marker = serial_marker.unwrap_or_else(|| config.report.serial_marker.clone());

            let closed = cmd_report(&credentials, project_id, plan_id, &serial_marker, cli.verbose)?;
            if !closed {
                std::process::exit(1);
            }
        }
        Commands::Submit {
            project_id,
            suite_id,
            case,
            device_id,
            device_serial,
            firmware,
            status,
            elapsed,
            downtime,
            dev_wait,
            settings_load,
            base_state,
            comment,
        } => {
            let project_id = project_id
                .or(config.report.project_id)
                .ok_or("Project id missing (use --project-id or the config file)")?;

            cmd_submit(
                &credentials,
                project_id,
                suite_id,
                &case,
                device_id,
                &device_serial,
                &firmware,
                &status,
                elapsed,
                downtime,
                dev_wait,
                settings_load,
                base_state,
                &comment,
                cli.verbose,
            )?;
        }
    }

    Ok(())
}
