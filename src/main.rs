// src/main.rs

use std::process::exit;

use sequence::{cli, logging, run};

#[tokio::main]
async fn main() {
    let prog = cli::program_name();

    let args = match cli::try_parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            let code = cli::exit_code_for(&err);
            let _ = err.print();
            exit(code);
        }
    };

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("{prog}: {err:?}");
        exit(1);
    }

    match run(args).await {
        Ok(outcome) => exit(outcome.exit_code()),
        Err(err) => {
            eprintln!("{prog}: {err}");
            exit(err.exit_code());
        }
    }
}
