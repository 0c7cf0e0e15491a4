use crate::output::{print_json, print_table};
use specflow_core::ambiguity::lexical;

pub fn run(text: &str, json: bool) -> anyhow::Result<()> {
    let issues = lexical::detect(text, None);

    if json {
        return print_json(&issues);
    }

    if issues.is_empty() {
        println!("No vague terms found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = issues
        .iter()
        .map(|i| {
            vec![
                i.original_text.clone(),
                i.severity.to_string(),
                i.ambiguity_type.to_string(),
                i.suggestion.clone(),
            ]
        })
        .collect();
    print_table(&["TERM", "SEVERITY", "TYPE", "SUGGESTION"], &rows);
    Ok(())
}
