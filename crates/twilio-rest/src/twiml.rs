//! TwiML voice response builder.
//!
//! Every webhook turn answers with a small TwiML document: zero or more
//! `<Say>` verbs followed by either a `<Gather>` (keep listening) or a
//! `<Hangup>`. The builder renders the XML directly rather than pulling in
//! an XML crate for a four-verb vocabulary.

/// Speech-input settings for a `<Gather>` verb.
#[derive(Debug, Clone)]
pub struct Gather {
    /// Webhook URL Twilio posts the transcribed speech to.
    pub action: String,
    /// Seconds of silence before Twilio gives up and posts an empty result.
    pub timeout_secs: u32,
}

impl Gather {
    /// Create a gather posting to `action` with the given silence timeout.
    pub fn new(action: impl Into<String>, timeout_secs: u32) -> Self {
        Self {
            action: action.into(),
            timeout_secs,
        }
    }
}

#[derive(Debug, Clone)]
enum Verb {
    Say { voice: String, text: String },
    Gather(Gather),
    Hangup,
    Redirect(String),
}

/// Builder for a TwiML `<Response>` document.
#[derive(Debug, Clone, Default)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    /// Create an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Speak `text` with the given Twilio voice.
    pub fn say(mut self, voice: impl Into<String>, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say {
            voice: voice.into(),
            text: text.into(),
        });
        self
    }

    /// Listen for speech and DTMF, posting the result to the gather's action.
    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    /// End the call.
    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    /// Redirect the call to another webhook URL.
    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect(url.into()));
        self
    }

    /// Render the response as an XML document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Say { voice, text } => {
                    xml.push_str(&format!(
                        "<Say voice=\"{}\">{}</Say>",
                        escape(voice),
                        escape(text)
                    ));
                }
                Verb::Gather(gather) => {
                    xml.push_str(&format!(
                        "<Gather input=\"speech dtmf\" action=\"{}\" method=\"POST\" \
                         numDigits=\"1\" timeout=\"{}\" speechTimeout=\"auto\"/>",
                        escape(&gather.action),
                        gather.timeout_secs
                    ));
                }
                Verb::Hangup => xml.push_str("<Hangup/>"),
                Verb::Redirect(url) => {
                    xml.push_str(&format!(
                        "<Redirect method=\"POST\">{}</Redirect>",
                        escape(url)
                    ));
                }
            }
        }
        xml.push_str("</Response>");
        xml
    }
}

/// Escape the five XML-reserved characters.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_say_then_gather() {
        let xml = VoiceResponse::new()
            .say("Polly.Joanna", "Hello")
            .gather(Gather::new("/voice?agentId=3", 10))
            .to_xml();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<Say voice=\"Polly.Joanna\">Hello</Say>"));
        assert!(xml.contains("action=\"/voice?agentId=3\""));
        assert!(xml.contains("timeout=\"10\""));
        assert!(xml.ends_with("</Response>"));
        assert!(!xml.contains("<Hangup/>"));
    }

    #[test]
    fn test_say_then_hangup() {
        let xml = VoiceResponse::new()
            .say("Polly.Matthew", "Goodbye")
            .hangup()
            .to_xml();
        assert!(xml.contains("<Say voice=\"Polly.Matthew\">Goodbye</Say>"));
        assert!(xml.contains("<Hangup/>"));
        assert!(!xml.contains("<Gather"));
    }

    #[test]
    fn test_escapes_reserved_characters() {
        let xml = VoiceResponse::new()
            .say("Polly.Joanna", "Tom & Jerry <3 \"quotes\"")
            .hangup()
            .to_xml();
        assert!(xml.contains("Tom &amp; Jerry &lt;3 &quot;quotes&quot;"));
    }

    #[test]
    fn test_redirect() {
        let xml = VoiceResponse::new().redirect("/voice?agentId=1").to_xml();
        assert!(xml.contains("<Redirect method=\"POST\">/voice?agentId=1</Redirect>"));
    }

    #[test]
    fn test_empty_response() {
        let xml = VoiceResponse::new().to_xml();
        assert!(xml.ends_with("<Response></Response>"));
    }
}
