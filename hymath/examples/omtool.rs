use clap::{Parser as ClapParser, ValueEnum};
use hymath::prelude::*;

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    Json,
    Compact,
    Xml,
    Eval,
    Free,
}

#[derive(ClapParser)]
pub struct Arguments {
    /// Expression to read, or a path to a file holding it
    input: String,

    /// Read the input as JSON instead of the compact syntax
    #[arg(long)]
    json: bool,

    /// What to print
    #[arg(short, long, value_enum, default_value = "json")]
    output: Output,
}

fn main() {
    let args = Arguments::parse();

    let path = std::path::Path::new(&args.input);
    let text = if path.is_file() {
        std::fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("Failed to read {}: {err}", args.input);
            std::process::exit(1);
        })
    } else {
        args.input.clone()
    };

    let mut arena = OmArena::new();
    let parsed = if args.json {
        arena.decode(&text)
    } else {
        arena.simple_decode(text.trim())
    };
    let expr = match parsed {
        Ok(expr) => expr,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    match args.output {
        Output::Json => match arena.encode(expr) {
            Ok(json) => println!("{json}"),
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            }
        },
        Output::Compact => println!("{}", arena.simple_encode(expr)),
        Output::Xml => {
            if let Err(error) = arena.xml_print(expr) {
                eprintln!("{error}");
                std::process::exit(1);
            }
        }
        Output::Eval => {
            let result = arena.evaluate(expr);
            if let Some(value) = result.value {
                println!("{value}");
            }
            if let Some(message) = result.message {
                eprintln!("{message}");
            }
        }
        Output::Free => {
            for name in arena.free_variables(expr) {
                println!("{name}");
            }
        }
    }
}
