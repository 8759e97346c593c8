//! System prompt assembly.

use database::models::{Agent, AgentDocument};

/// Build the system prompt for an agent's conversation turn.
///
/// The agent's prompt text, then its company info, then the content of each
/// bound document under a delimited section. Documents with empty content
/// are skipped.
pub fn build_system_prompt(agent: &Agent, documents: &[AgentDocument]) -> String {
    let mut prompt = agent.prompt.trim().to_string();

    if let Some(company_info) = agent.company_info.as_deref() {
        let company_info = company_info.trim();
        if !company_info.is_empty() {
            prompt.push_str("\n\nCOMPANY INFORMATION:\n");
            prompt.push_str(company_info);
        }
    }

    let with_content: Vec<&AgentDocument> = documents
        .iter()
        .filter(|doc| !doc.content.trim().is_empty())
        .collect();
    if !with_content.is_empty() {
        prompt.push_str("\n\nRELEVANT DOCUMENTS:\n");
        for doc in with_content {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", doc.name, doc.content.trim()));
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(prompt: &str, company_info: Option<&str>) -> Agent {
        Agent {
            id: 1,
            user_id: None,
            name: "Ava".to_string(),
            prompt: prompt.to_string(),
            first_sentence: None,
            voice: "alloy".to_string(),
            gender: "female".to_string(),
            max_call_duration_mins: 10,
            max_wait_secs: 10,
            company_info: company_info.map(str::to_string),
            email_after_call: false,
            notification_email: None,
            created_at: String::new(),
        }
    }

    fn document(name: &str, content: &str) -> AgentDocument {
        AgentDocument {
            id: 1,
            agent_id: 1,
            name: name.to_string(),
            content: content.to_string(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_prompt_alone() {
        let prompt = build_system_prompt(&agent("You are helpful.", None), &[]);
        assert_eq!(prompt, "You are helpful.");
    }

    #[test]
    fn test_company_info_appended() {
        let prompt = build_system_prompt(&agent("You are helpful.", Some("Acme Corp.")), &[]);
        assert!(prompt.contains("COMPANY INFORMATION:\nAcme Corp."));
    }

    #[test]
    fn test_empty_documents_skipped() {
        let docs = vec![document("Empty", "   "), document("Hours", "Open 9-5.")];
        let prompt = build_system_prompt(&agent("You are helpful.", None), &docs);
        assert!(prompt.contains("RELEVANT DOCUMENTS:"));
        assert!(prompt.contains("--- Hours ---\nOpen 9-5."));
        assert!(!prompt.contains("Empty"));
    }

    #[test]
    fn test_no_section_when_all_documents_empty() {
        let docs = vec![document("Empty", "")];
        let prompt = build_system_prompt(&agent("You are helpful.", None), &docs);
        assert!(!prompt.contains("RELEVANT DOCUMENTS"));
    }
}
