use std::{
    env,
    io::{self, Write},
    process,
};

use benchcheck::{
    cli::{CliError, CompareConfig, Invocation, program_name},
    commands::run_compare,
    logging::init_logging,
};

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let program = program_name(&arg_refs, "compare_platforms");

    let config = match CompareConfig::from_args(&arg_refs) {
        Ok(Invocation::Run(cfg)) => cfg,
        Ok(Invocation::Help) => {
            print!("{}", CompareConfig::help(program));
            return;
        }
        Err(CliError::Usage) => {
            println!("{}", CompareConfig::usage(program));
            process::exit(1);
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    // mismatches are advisory; only unreadable input changes the status
    let mut stdout = io::stdout().lock();
    let result = run_compare(&config, &mut stdout);
    let _ = stdout.flush();
    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(2);
    }
}
