use hexagraph::GraphDb;
use hexagraph::commands::dispatch;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

const HISTORY_FILE: &str = ".hexagraph_history";

/// Splits a command line into arguments, honouring single and double
/// quotes so query text can carry spaces.
fn split_command(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut pending = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
            }
            Some(_) => {
                current.push(c);
            }
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                pending = true;
            }
            None if c.is_whitespace() => {
                if pending || !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            None => {
                current.push(c);
            }
        }
    }
    if pending || !current.is_empty() {
        args.push(current);
    }
    args
}

fn print_help() {
    println!("Commands:");
    println!("  ADDEDGE <graph> <subject> <predicate> <object>");
    println!("  REMOVEEDGE <graph> <subject> <predicate> <object>");
    println!("  DELETE <graph>");
    println!("  SETPROP <graph> node|edge <label> <id> <key> <value>");
    println!("  QUERY <graph> \"MATCH (a)-[r:TYPE]->(b) WHERE ... RETURN ...\"");
    println!("  .help    show this message");
    println!("  .exit    quit");
}

pub fn run_repl() -> Result<(), String> {
    println!("hexagraph v{}", env!("CARGO_PKG_VERSION"));
    println!("Type .help for instructions, .exit to quit.\n");

    let mut db = GraphDb::new();
    let mut rl = DefaultEditor::new().map_err(|e| e.to_string())?;
    let _ = rl.load_history(HISTORY_FILE);

    loop {
        match rl.readline("hexagraph> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    ".exit" | ".quit" => break,
                    ".help" => {
                        print_help();
                        continue;
                    }
                    _ => {}
                }

                let args = split_command(line);
                let argv: Vec<&str> = args.iter().map(String::as_str).collect();
                match dispatch(&mut db, &argv) {
                    Ok(reply) => crate::print_reply(&reply),
                    Err(err) => println!("{err}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.to_string()),
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::split_command;

    #[test]
    fn splits_on_whitespace_outside_quotes() {
        assert_eq!(
            split_command("ADDEDGE g a knows b"),
            vec!["ADDEDGE", "g", "a", "knows", "b"]
        );
    }

    #[test]
    fn quotes_keep_query_text_together() {
        assert_eq!(
            split_command("QUERY g \"MATCH (a)-[r]->(b) RETURN a\""),
            vec!["QUERY", "g", "MATCH (a)-[r]->(b) RETURN a"]
        );
    }

    #[test]
    fn empty_quoted_argument_survives() {
        assert_eq!(split_command("DELETE ''"), vec!["DELETE", ""]);
    }
}
