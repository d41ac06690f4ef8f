// Command abbreviation matching for the Sheetdash CLI

/// Top-level commands in Sheetdash
pub const TOP_LEVEL_COMMANDS: &[&str] = &["sources", "list", "set", "schema", "stats"];

/// Global options that take a separate value argument
const GLOBAL_VALUE_OPTIONS: &[&str] = &["--source"];

/// Find all commands that start with the given prefix (case-insensitive)
pub fn find_matching_commands<'a>(prefix: &str, commands: &'a [&str]) -> Vec<&'a str> {
    let prefix_lower = prefix.to_lowercase();
    commands
        .iter()
        .filter(|cmd| cmd.to_lowercase().starts_with(&prefix_lower))
        .copied()
        .collect()
}

/// Find a unique command match for the given prefix
///
/// Returns Ok(command) if exactly one match, Err(matches) if ambiguous,
/// Err(empty) if no match. Exact matches take precedence over prefix matches
/// ("set" matches "set" even though it is a prefix of nothing else).
pub fn find_unique_command<'a>(prefix: &str, commands: &'a [&str]) -> Result<&'a str, Vec<&'a str>> {
    let prefix_lower = prefix.to_lowercase();
    if let Some(cmd) = commands.iter().find(|cmd| cmd.to_lowercase() == prefix_lower) {
        return Ok(cmd);
    }

    let matches = find_matching_commands(prefix, commands);
    if matches.len() == 1 {
        Ok(matches[0])
    } else {
        Err(matches)
    }
}

/// Position of the command word, skipping leading global options
fn command_position(args: &[String]) -> Option<usize> {
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if GLOBAL_VALUE_OPTIONS.contains(&arg.as_str()) {
            i += 2;
        } else if arg.starts_with('-') {
            i += 1;
        } else {
            return Some(i);
        }
    }
    None
}

/// Expand the command abbreviation in an argument list
/// Returns expanded args or error message
pub fn expand_command_abbreviations(mut args: Vec<String>) -> Result<Vec<String>, String> {
    let Some(pos) = command_position(&args) else {
        return Ok(args);
    };

    match find_unique_command(&args[pos], TOP_LEVEL_COMMANDS) {
        Ok(full_cmd) => {
            args[pos] = full_cmd.to_string();
            Ok(args)
        }
        // No match - let clap report the unknown command
        Err(matches) if matches.is_empty() => Ok(args),
        Err(matches) => Err(format!(
            "Ambiguous command '{}'. Did you mean one of: {}?",
            args[pos],
            matches.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_matching_commands() {
        assert_eq!(find_matching_commands("s", TOP_LEVEL_COMMANDS), vec!["sources", "set", "schema", "stats"]);
        assert_eq!(find_matching_commands("st", TOP_LEVEL_COMMANDS), vec!["stats"]);
        assert!(find_matching_commands("x", TOP_LEVEL_COMMANDS).is_empty());
    }

    #[test]
    fn test_find_unique_command() {
        assert_eq!(find_unique_command("l", TOP_LEVEL_COMMANDS), Ok("list"));
        assert_eq!(find_unique_command("SO", TOP_LEVEL_COMMANDS), Ok("sources"));
        assert_eq!(find_unique_command("set", TOP_LEVEL_COMMANDS), Ok("set"));
        assert_eq!(find_unique_command("sc", TOP_LEVEL_COMMANDS), Ok("schema"));

        let matches = find_unique_command("s", TOP_LEVEL_COMMANDS);
        assert_eq!(matches, Err(vec!["sources", "set", "schema", "stats"]));
    }

    #[test]
    fn test_expand_command_abbreviations() {
        assert_eq!(expand_command_abbreviations(args(&["li"])), Ok(args(&["list"])));
        assert_eq!(
            expand_command_abbreviations(args(&["li", "group=Sales", "--json"])),
            Ok(args(&["list", "group=Sales", "--json"]))
        );

        let result = expand_command_abbreviations(args(&["s"]));
        assert!(matches!(result, Err(msg) if msg.contains("Ambiguous")));
    }

    #[test]
    fn test_global_source_option_is_skipped() {
        assert_eq!(
            expand_command_abbreviations(args(&["--source", "li", "sta"])),
            Ok(args(&["--source", "li", "stats"]))
        );
        assert_eq!(
            expand_command_abbreviations(args(&["--source=certeco", "li"])),
            Ok(args(&["--source=certeco", "list"]))
        );
    }

    #[test]
    fn test_unknown_and_empty_pass_through() {
        assert_eq!(expand_command_abbreviations(args(&["bogus"])), Ok(args(&["bogus"])));
        assert_eq!(expand_command_abbreviations(Vec::new()), Ok(Vec::new()));
        assert_eq!(expand_command_abbreviations(args(&["--help"])), Ok(args(&["--help"])));
    }
}
