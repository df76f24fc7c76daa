//! Prompt construction for drug analysis questions.

use serde_json::Value;

const FIELDS: [(&str, &str); 5] = [
    ("Drug SMILES", "drug_smiles"),
    ("Target Sequence", "target_sequence"),
    ("Drug-likeness", "drug_likeness"),
    ("Binding Score", "binding_score"),
    ("ADMET Properties", "admet"),
];

/// Embed the known properties of a drug ahead of the user's question.
/// Missing fields are rendered as `not provided`.
pub fn build_analysis_prompt(drug_data: &Value, question: &str) -> String {
    let mut prompt = String::from("Context: Analyzing drug with the following properties:\n");
    for (label, key) in FIELDS {
        prompt.push_str(&format!("- {label}: {}\n", render(drug_data.get(key))));
    }
    prompt.push_str(&format!("\nUser Question: {question}"));
    prompt
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "not provided".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_prompt_layout() {
        let data = json!({
            "drug_smiles": "CCO",
            "target_sequence": "MKT",
            "drug_likeness": {"drug_likeness": "Pass"},
            "binding_score": 5.5,
            "admet": {"toxicity": {"risk_level": "Low"}},
        });
        let prompt = build_analysis_prompt(&data, "Is this safe?");
        assert_eq!(
            prompt,
            "Context: Analyzing drug with the following properties:\n\
             - Drug SMILES: CCO\n\
             - Target Sequence: MKT\n\
             - Drug-likeness: {\"drug_likeness\":\"Pass\"}\n\
             - Binding Score: 5.5\n\
             - ADMET Properties: {\"toxicity\":{\"risk_level\":\"Low\"}}\n\
             \n\
             User Question: Is this safe?"
        );
    }

    #[test]
    fn test_missing_fields() {
        let prompt = build_analysis_prompt(&json!({}), "q");
        assert_eq!(prompt.matches("not provided").count(), 5);
        assert!(prompt.ends_with("User Question: q"));
    }
}
