use std::path::PathBuf;
use tracksync_cli::{
    command, env_bool, init_tracing, load_env_file, parse_file, run, RunOptions, ENV_LOG_JSON,
};

#[tokio::main]
async fn main() {
    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("run", args)) => {
            let env_file = load_env_file();
            init_tracing(args.get_flag("json-logs") || env_bool(ENV_LOG_JSON, false));
            match env_file {
                Ok(Some(path)) => tracing::debug!(path = %path.display(), "loaded environment file"),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "ignoring unreadable environment file"),
            }

            let (Some(config), Some(state)) = (
                args.get_one::<PathBuf>("config"),
                args.get_one::<PathBuf>("state"),
            ) else {
                std::process::exit(2);
            };
            let options = RunOptions {
                config: config.clone(),
                state: state.clone(),
            };

            let status = run(&options).await;
            std::process::exit(status.code());
        }
        Some(("parse", args)) => {
            init_tracing(env_bool(ENV_LOG_JSON, false));

            let Some(file) = args.get_one::<PathBuf>("file") else {
                std::process::exit(2);
            };
            let config = args.get_one::<PathBuf>("config");

            match parse_file(file, config.map(PathBuf::as_path)) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: {e:#}");
                    std::process::exit(1);
                }
            }
        }
        other => {
            eprintln!("error: unsupported subcommand {:?}", other.map(|(name, _)| name));
            std::process::exit(2);
        }
    }
}
