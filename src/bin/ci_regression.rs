use std::{
    env,
    io::{self, Write},
    process,
};

use benchcheck::{
    cli::{CliError, Invocation, RegressionConfig, program_name},
    commands::run_regression,
    logging::init_logging,
};

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();
    let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let program = program_name(&arg_refs, "ci_regression");

    let config = match RegressionConfig::from_args(&arg_refs) {
        Ok(Invocation::Run(cfg)) => cfg,
        Ok(Invocation::Help) => {
            print!("{}", RegressionConfig::help(program));
            return;
        }
        Err(CliError::Usage) => {
            println!("{}", RegressionConfig::usage(program));
            process::exit(1);
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let mut stdout = io::stdout().lock();
    let result = run_regression(&config, &mut stdout);
    let _ = stdout.flush();
    match result {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }
}
