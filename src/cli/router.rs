use std::ffi::OsString;

/// Known subcommands that should NOT trigger `run` insertion.
/// These match the Commands enum variants in kebab-case.
const KNOWN_SUBCOMMANDS: &[&str] = &["run", "list", "show", "validate", "info", "config"];

/// Global flags that consume the following argument as their value.
const VALUE_FLAGS: &[&str] = &["--root", "--manifest"];

/// Route CLI arguments to the appropriate command.
///
/// Lets `slash-registry /lint` work as an alias for `slash-registry run /lint`.
///
/// # Routing Logic
///
/// The router skips leading global flags (and the values of `--root`/`--manifest`) and
/// inspects the first positional argument:
///
/// - If it is a known subcommand: unchanged
/// - If it starts with `marker`: insert "run" right before it
/// - Otherwise (including no positional at all): unchanged, clap reports the error
///
/// # Examples
///
/// ```text
/// slash-registry /lint                  -> slash-registry run /lint
/// slash-registry -v /api-new a user     -> slash-registry -v run /api-new a user
/// slash-registry --root p /lint         -> slash-registry --root p run /lint
/// slash-registry list                   -> slash-registry list (unchanged)
/// slash-registry --help                 -> slash-registry --help (unchanged)
/// ```
pub fn route_args<I, T>(args: I, marker: char) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    let Some(position) = first_positional(&args) else {
        return args;
    };

    let first = args[position].to_string_lossy();
    if KNOWN_SUBCOMMANDS.contains(&first.as_ref()) || !first.starts_with(marker) {
        return args;
    }

    let mut routed = Vec::with_capacity(args.len() + 1);
    routed.extend_from_slice(&args[..position]);
    routed.push("run".into());
    routed.extend_from_slice(&args[position..]);
    routed
}

/// Index of the first argument after the program name that is not a global flag.
fn first_positional(args: &[OsString]) -> Option<usize> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].to_string_lossy();
        if arg == "--" {
            return None;
        }
        if VALUE_FLAGS.contains(&arg.as_ref()) {
            i += 2;
            continue;
        }
        if arg.starts_with('-') && arg.len() > 1 {
            i += 1;
            continue;
        }
        return Some(i);
    }
    None
}
