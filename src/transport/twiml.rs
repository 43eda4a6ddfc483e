use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::domain::{CallScript, Verb};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to write TwiML: {0}")]
    Xml(String),

    #[error("TwiML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render a call script as a TwiML `<Response>` document.
pub fn render_twiml(script: &CallScript) -> Result<String, TransportError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write(&mut writer, Event::Start(BytesStart::new("Response")))?;

    for verb in script.verbs() {
        match verb {
            Verb::Pause { length } => {
                let length = length.value().to_string();
                let mut pause = BytesStart::new("Pause");
                pause.push_attribute(("length", length.as_str()));
                write(&mut writer, Event::Empty(pause))?;
            }
            Verb::Say { text } => {
                write_text_element(&mut writer, "Say", text.as_str())?;
            }
            Verb::DialConference { room } => {
                write(&mut writer, Event::Start(BytesStart::new("Dial")))?;
                write_text_element(&mut writer, "Conference", room.as_str())?;
                write(&mut writer, Event::End(BytesEnd::new("Dial")))?;
            }
        }
    }

    write(&mut writer, Event::End(BytesEnd::new("Response")))?;

    let xml = writer.into_inner().into_inner();
    Ok(String::from_utf8(xml)?)
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<(), TransportError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), TransportError> {
    writer
        .write_event(event)
        .map_err(|err| TransportError::Xml(err.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::domain::{ConferenceRoom, PauseSeconds, SpokenMessage};

    use super::*;

    const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

    #[test]
    fn announcement_pauses_then_speaks() {
        let script = CallScript::announcement(
            PauseSeconds::default(),
            SpokenMessage::new("Hello Alice").unwrap(),
        );

        assert_eq!(
            render_twiml(&script).unwrap(),
            format!(r#"{DECL}<Response><Pause length="10"/><Say>Hello Alice</Say></Response>"#)
        );
    }

    #[test]
    fn conference_dials_into_room() {
        let script = CallScript::conference(
            PauseSeconds::new(3).unwrap(),
            SpokenMessage::new("Joining now").unwrap(),
            ConferenceRoom::default(),
        );

        assert_eq!(
            render_twiml(&script).unwrap(),
            format!(
                "{DECL}<Response><Pause length=\"3\"/><Say>Joining now</Say>\
                 <Dial><Conference>MyConferenceRoom</Conference></Dial></Response>"
            )
        );
    }

    #[test]
    fn spoken_text_is_escaped() {
        let script = CallScript::new().say(SpokenMessage::new("1 < 2 & more").unwrap());
        let xml = render_twiml(&script).unwrap();
        assert!(xml.contains("<Say>1 &lt; 2 &amp; more</Say>"), "{xml}");
    }

    #[test]
    fn empty_script_is_bare_response() {
        assert_eq!(
            render_twiml(&CallScript::new()).unwrap(),
            format!("{DECL}<Response></Response>")
        );
    }
}
