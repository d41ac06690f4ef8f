use sheetdash::cli::run;
use sheetdash::error::DashError;

fn main() {
    if let Err(e) = run() {
        // Dashboard errors are user-facing; anything else is unexpected
        if e.downcast_ref::<DashError>().is_some() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }

        eprintln!("Internal error: {}", e);
        let mut causes = e.chain().skip(1).peekable();
        if causes.peek().is_some() {
            eprintln!("\nCaused by:");
            for (indent, err) in causes.enumerate() {
                eprintln!("{:indent$}  {}", "", err, indent = indent + 1);
            }
        }
        std::process::exit(2);
    }
}
