use tether_core::{ControlPatch, ControlState};

/// A line typed on the controller's stdin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Patch(ControlPatch),
    Quit,
}

/// `a` / `b` toggle, `a on|off` / `b on|off` set, `pad X Y` moves the
/// trackpad, `quit` exits.
pub fn parse_command(line: &str, current: &ControlState) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();

    match words.as_slice() {
        ["quit"] | ["exit"] => Ok(Command::Quit),
        ["a"] => Ok(Command::Patch(ControlPatch::a(!current.a))),
        ["b"] => Ok(Command::Patch(ControlPatch::b(!current.b))),
        ["a", value] => parse_switch(value).map(|on| Command::Patch(ControlPatch::a(on))),
        ["b", value] => parse_switch(value).map(|on| Command::Patch(ControlPatch::b(on))),
        ["pad", x, y] => {
            let x = parse_coord(x)?;
            let y = parse_coord(y)?;
            Ok(Command::Patch(ControlPatch::trackpad(x, y)))
        }
        [] => Err("empty command".to_owned()),
        _ => Err(format!("unknown command: {}", line.trim())),
    }
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value {
        "on" | "1" | "true" => Ok(true),
        "off" | "0" | "false" => Ok(false),
        other => Err(format!("expected on|off, got {}", other)),
    }
}

fn parse_coord(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("not a coordinate: {}", value))
}
