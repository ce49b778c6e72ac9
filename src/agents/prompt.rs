//! Prompt templates for the generation and evaluation nodes

use crate::types::RetrievedDocument;

/// Prompt builder for the orchestration graph
pub struct PromptBuilder;

impl PromptBuilder {
    /// Number and concatenate the retrieved documents
    pub fn build_context(docs: &[RetrievedDocument]) -> String {
        docs.iter()
            .enumerate()
            .map(|(i, d)| format!("[{}] {}", i + 1, d.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Grounded answer prompt: the model may only use the provided context
    pub fn build_answer_prompt(query: &str, docs: &[RetrievedDocument]) -> String {
        format!(
            r#"You are a helpful assistant.
Answer the query using ONLY the information provided.

Query: {query}
Information:
{context}"#,
            query = query,
            context = Self::build_context(docs),
        )
    }

    /// Self-evaluation prompt requesting JSON faithfulness/relevance scores
    pub fn build_eval_prompt(query: &str, docs: &[RetrievedDocument], answer: &str) -> String {
        format!(
            r#"Evaluate the following RAG output.

Query: {query}
Retrieved info:
{context}
Answer: {answer}

Provide two scores between 0 and 1:
- faithfulness
- relevance

Output Requirements:
- Return only valid JSON - no extra text, no markdown, no code fences.
- The JSON must have exactly the following keys:

    "faithfulness": "...",
    "relevance": "...",
    "comment": "<brief explanation>"

- Do not infer or assume missing information beyond what is provided.
- The response must be directly parseable by JSON parsers."#,
            query = query,
            context = Self::build_context(docs),
            answer = answer,
        )
    }
}
