//! Prompt templates for policy question answering

/// Prompt builder for grounded policy answers
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the grounded answer prompt from the retrieved policy text
    pub fn build_policy_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are an assistant that answers questions about a single policy document.

Answer the question using ONLY the policy text below.
If the policy does not explicitly mention it, say so clearly.
You may briefly explain implied alignment, if any, without assuming facts.
When you reference information, mention the page number like "According to page X" or "On page Y".

POLICY TEXT:
{context}

QUESTION: {question}

ANSWER:"#,
            context = context,
            question = question
        )
    }

    /// Build the prompt used to condense one page before chunking
    pub fn build_compression_prompt(text: &str) -> String {
        format!(
            r#"Rewrite the following policy page so it uses as few words as possible.
Keep every rule, number, date, name, condition and exception exactly as stated.
Do not add commentary, headings or information that is not in the page.
Return only the rewritten text.

PAGE:
{text}

REWRITTEN PAGE:"#,
            text = text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_prompt_sections() {
        let prompt = PromptBuilder::build_policy_prompt(
            "How many vacation days?",
            "[Page 1]\nEmployees get 15 vacation days per year.",
        );

        assert!(prompt.contains("ONLY the policy text"));
        assert!(prompt.contains("say so clearly"));
        assert!(prompt.contains("According to page X"));

        let policy = prompt.find("POLICY TEXT:").unwrap();
        let context = prompt.find("[Page 1]").unwrap();
        let question = prompt.find("QUESTION: How many vacation days?").unwrap();
        assert!(policy < context && context < question);
    }

    #[test]
    fn test_compression_prompt_embeds_page() {
        let prompt =
            PromptBuilder::build_compression_prompt("Remote work requires manager approval.");
        assert!(prompt.contains("PAGE:\nRemote work requires manager approval."));
    }
}
