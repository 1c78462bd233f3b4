//! Control-topic commands.
//!
//! | Topic | Payload |
//! |-------|---------|
//! | `SPARKPLUG_TCK/TEST_CONTROL` | `NEW_TEST <profile> <name> <params…>` or `END_TEST` |
//! | `SPARKPLUG_TCK/CONFIG` | `UTCwindow <ms>` |
//! | `SPARKPLUG_TCK/LOG` | free text |
//!
//! Tokens are separated by whitespace; a double-quoted token may contain
//! spaces. Payloads are UTF-8 text.

use tck_core::constants::{CONFIG_TOPIC, LOG_TOPIC, TEST_CONTROL_TOPIC};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("empty control payload on {0}")]
    Empty(String),

    #[error("unknown control command {command:?} on {topic}")]
    UnknownCommand { topic: String, command: String },

    #[error("malformed control payload: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    NewTest {
        profile: String,
        name: String,
        params: Vec<String>,
    },
    EndTest,
    UtcWindow(u64),
    Log(String),
}

/// Split `input` on whitespace, keeping double-quoted runs together.
///
/// # Errors
///
/// [`ControlError::Malformed`] on an unterminated quote.
pub fn tokenize(input: &str) -> Result<Vec<String>, ControlError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        return Err(ControlError::Malformed(format!("unterminated quote in {input:?}")));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse a publish on a control topic. Returns `Ok(None)` for topics that
/// carry no command (e.g. the results topic the engine itself publishes to).
///
/// # Errors
///
/// Returns a [`ControlError`] describing why the payload was rejected.
pub fn parse(topic: &str, payload: &[u8]) -> Result<Option<ControlCommand>, ControlError> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| ControlError::Malformed(format!("{topic}: payload is not UTF-8: {e}")))?;

    match topic {
        LOG_TOPIC => Ok(Some(ControlCommand::Log(text.trim().to_owned()))),
        TEST_CONTROL_TOPIC => parse_test_control(topic, text).map(Some),
        CONFIG_TOPIC => parse_config(topic, text).map(Some),
        _ => Ok(None),
    }
}

fn parse_test_control(topic: &str, text: &str) -> Result<ControlCommand, ControlError> {
    let tokens = tokenize(text)?;
    let Some((command, rest)) = tokens.split_first() else {
        return Err(ControlError::Empty(topic.to_owned()));
    };
    match command.as_str() {
        "NEW_TEST" => match rest {
            [profile, name, params @ ..] => Ok(ControlCommand::NewTest {
                profile: profile.clone(),
                name: name.clone(),
                params: params.to_vec(),
            }),
            _ => Err(ControlError::Malformed(format!(
                "NEW_TEST needs a profile and a test name, got {rest:?}"
            ))),
        },
        "END_TEST" => Ok(ControlCommand::EndTest),
        other => Err(ControlError::UnknownCommand {
            topic: topic.to_owned(),
            command: other.to_owned(),
        }),
    }
}

fn parse_config(topic: &str, text: &str) -> Result<ControlCommand, ControlError> {
    let tokens = tokenize(text)?;
    match tokens.as_slice() {
        [] => Err(ControlError::Empty(topic.to_owned())),
        [key, value] if key == "UTCwindow" => value
            .parse::<u64>()
            .ok()
            .filter(|ms| *ms > 0)
            .map(ControlCommand::UtcWindow)
            .ok_or_else(|| ControlError::Malformed(format!("UTCwindow {value:?} is not a positive integer"))),
        [key, ..] => Err(ControlError::UnknownCommand {
            topic: topic.to_owned(),
            command: key.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tck_core::constants::RESULT_TOPIC;

    #[test]
    fn tokenize_keeps_quoted_runs() {
        assert_eq!(
            tokenize(r#"NEW_TEST edge "Session Test" G1  E1"#).unwrap(),
            vec!["NEW_TEST", "edge", "Session Test", "G1", "E1"]
        );
        assert_eq!(tokenize(r#"a "" b"#).unwrap(), vec!["a", "", "b"]);
        assert!(tokenize(r#"a "b"#).is_err());
    }

    #[test]
    fn new_test_with_params() {
        let cmd = parse(
            TEST_CONTROL_TOPIC,
            b"NEW_TEST host MessageOrderingTest H1 G1 E1 D1 5000",
        )
        .unwrap();
        assert_eq!(
            cmd,
            Some(ControlCommand::NewTest {
                profile: "host".into(),
                name: "MessageOrderingTest".into(),
                params: vec!["H1", "G1", "E1", "D1", "5000"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })
        );
    }

    #[test]
    fn end_test() {
        assert_eq!(
            parse(TEST_CONTROL_TOPIC, b"END_TEST").unwrap(),
            Some(ControlCommand::EndTest)
        );
    }

    #[test]
    fn rejects_bad_test_control() {
        assert!(matches!(parse(TEST_CONTROL_TOPIC, b"  "), Err(ControlError::Empty(_))));
        assert!(matches!(
            parse(TEST_CONTROL_TOPIC, b"NEW_TEST edge"),
            Err(ControlError::Malformed(_))
        ));
        assert!(matches!(
            parse(TEST_CONTROL_TOPIC, b"RESTART"),
            Err(ControlError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn utc_window() {
        assert_eq!(
            parse(CONFIG_TOPIC, b"UTCwindow 1500").unwrap(),
            Some(ControlCommand::UtcWindow(1500))
        );
        assert!(parse(CONFIG_TOPIC, b"UTCwindow 0").is_err());
        assert!(parse(CONFIG_TOPIC, b"UTCwindow soon").is_err());
    }

    #[test]
    fn result_topic_carries_no_command() {
        assert_eq!(parse(RESULT_TOPIC, b"OVERALL: PASS;").unwrap(), None);
    }
}
