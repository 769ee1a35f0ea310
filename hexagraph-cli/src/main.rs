use clap::{Parser, Subcommand};
use hexagraph::commands::{Reply, dispatch};
use hexagraph::{GraphDb, QueryResult, Value};

mod repl;

#[derive(Parser)]
#[command(name = "hexagraph", version, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute one command and exit, e.g. `exec ADDEDGE g a knows b`
    Exec(ExecArgs),
    /// Start the interactive shell
    Repl,
}

#[derive(Parser)]
struct ExecArgs {
    /// Command and arguments, e.g. `QUERY g "MATCH (a)-[r]->(b) RETURN a"`
    #[arg(trailing_var_arg = true, required = true)]
    command: Vec<String>,
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
    }
}

fn print_result(result: &QueryResult) {
    println!(
        "{}",
        serde_json::Value::Array(
            result
                .columns
                .iter()
                .map(|c| serde_json::Value::String(c.clone()))
                .collect()
        )
    );
    for row in &result.rows {
        let json = serde_json::Value::Array(row.iter().map(value_to_json).collect());
        println!("{json}");
    }
    println!("{}", result.trailer());
}

pub(crate) fn print_reply(reply: &Reply) {
    match reply {
        Reply::Integer(n) => println!("(integer) {n}"),
        Reply::Rows(result) => print_result(result),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Exec(args) => {
            let argv: Vec<&str> = args.command.iter().map(String::as_str).collect();
            let mut db = GraphDb::new();
            match dispatch(&mut db, &argv) {
                Ok(reply) => print_reply(&reply),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Repl => {
            if let Err(err) = repl::run_repl() {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}
