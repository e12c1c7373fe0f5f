use clap::{Parser, Subcommand, ValueEnum};
use layout::{LayoutError, PropertyAttributes, SignatureLayout};
use parser::{Abi, TypeKind, TypeNode, TypeParser};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "typenc", version, about = "Inspect runtime type encodings and method signatures")]
struct Cli {
    /// Data model used for sizes (defaults to the host)
    #[arg(long, value_enum, global = true)]
    abi: Option<AbiArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AbiArg {
    Lp64,
    Ilp32,
}

impl From<AbiArg> for Abi {
    fn from(arg: AbiArg) -> Abi {
        match arg {
            AbiArg::Lp64 => Abi::Lp64,
            AbiArg::Ilp32 => Abi::Ilp32,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the tokens of an encoding
    Tokens { encoding: String },
    /// Parse one type encoding and print its tree
    Parse { encoding: String },
    /// Resolve one slot of a method signature (0 = return, 1 = self, 2 = _cmd)
    Arg { signature: String, index: usize },
    /// Print every slot of a method signature
    Signature { signature: String },
    /// Decode a property attribute string
    Property { attributes: String },
}

impl Command {
    fn input(&self) -> &str {
        match self {
            Command::Tokens { encoding } | Command::Parse { encoding } => encoding,
            Command::Arg { signature, .. } | Command::Signature { signature } => signature,
            Command::Property { attributes } => attributes,
        }
    }
}

fn describe(node: &TypeNode) -> String {
    match node.kind() {
        TypeKind::Struct { name, fields } => format!(
            "struct {} ({} fields)",
            name.as_deref().unwrap_or("<anonymous>"),
            fields.len()
        ),
        TypeKind::Union { name, fields } => format!(
            "union {} ({} fields)",
            name.as_deref().unwrap_or("<anonymous>"),
            fields.len()
        ),
        TypeKind::Pointer(_) => "pointer".to_string(),
        TypeKind::Array { count, .. } => format!("array of {}", count),
        TypeKind::Bitfield(width) => format!("bitfield : {}", width),
        TypeKind::Object(Some(class)) => format!("object {}", class),
        TypeKind::Object(None) => "object".to_string(),
        other => format!("{:?}", other),
    }
}

fn print_tree(node: &TypeNode, depth: usize) {
    let layout = if node.is_bitfield() {
        format!("{} bits", node.size())
    } else if node.is_sized() {
        format!("size {}, align {}", node.size(), node.alignment())
    } else {
        "size unknown".to_string()
    };
    println!("{}{} [{}]", "  ".repeat(depth), describe(node), layout);

    match node.kind() {
        TypeKind::Pointer(inner) => print_tree(inner, depth + 1),
        TypeKind::Array { element, .. } => print_tree(element, depth + 1),
        TypeKind::Struct { fields, .. } | TypeKind::Union { fields, .. } => {
            for field in fields {
                print_tree(field, depth + 1);
            }
        }
        _ => {}
    }
}

fn run(command: &Command, abi: Abi) -> Result<(), LayoutError> {
    match command {
        Command::Tokens { encoding } => {
            for (token, span) in lexer::lex(encoding) {
                println!("{:>3}..{:<3} {:?}", span.start, span.end, token);
            }
        }

        Command::Parse { encoding } => {
            let (node, end) = TypeParser::new(abi).parse_at(encoding, 0)?;
            println!("encoding: {}", node);
            if end < encoding.len() {
                println!("consumed: {} of {} bytes", end, encoding.len());
            }
            print_tree(&node, 0);
        }

        Command::Arg { signature, index } => {
            let argument = SignatureLayout::new(abi).argument_at(signature, *index)?;
            println!("encoding: {}", argument.encoding);
            println!("size: {}", argument.node.storage_size());
            print_tree(&argument.node, 0);
        }

        Command::Signature { signature } => {
            let parsed = SignatureLayout::new(abi).signature(signature)?;
            for (index, slot) in parsed.slots().iter().enumerate() {
                let role = match index {
                    0 => "return",
                    1 => "self",
                    2 => "_cmd",
                    _ => "arg",
                };
                println!("{:>3}  {:<6} {:<32} {}", index, role, slot.to_string(), slot.storage_size());
            }
        }

        Command::Property { attributes } => {
            let attrs = PropertyAttributes::parse_with(attributes, TypeParser::new(abi))?;
            println!("type: {}", attrs.type_encoding);
            println!("size: {}", attrs.storage_size(abi)?);
            if let Some(ivar) = &attrs.backing_ivar {
                println!("backing ivar: {}", ivar);
            }
            if let Some(getter) = &attrs.getter {
                println!("getter: {}", getter);
            }
            if let Some(setter) = &attrs.setter {
                println!("setter: {}", setter);
            }

            let flags: Vec<&str> = [
                (attrs.readonly, "readonly"),
                (attrs.copy, "copy"),
                (attrs.retain, "retain"),
                (attrs.weak, "weak"),
                (attrs.nonatomic, "nonatomic"),
                (attrs.dynamic, "dynamic"),
                (attrs.garbage_collectable, "garbage-collectable"),
            ]
            .into_iter()
            .filter_map(|(set, name)| set.then_some(name))
            .collect();
            if !flags.is_empty() {
                println!("flags: {}", flags.join(", "));
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let abi = cli.abi.map(Abi::from).unwrap_or_default();
    debug!(?abi, "data model");

    match run(&cli.command, abi) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if layout::error::report_error("<input>", cli.command.input(), &error).is_err() {
                eprintln!("error: {}", error);
            }
            ExitCode::FAILURE
        }
    }
}
