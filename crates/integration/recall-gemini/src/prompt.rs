use recall_core::RecallTable;

const PREAMBLE: &str = "You are an AI assistant specialized in vehicle recall data. \
You will be given a dataset containing vehicle recalls, including affected models, issues, \
solutions, and remedies. Your task is to answer user questions accurately based on this data.";

/// Assemble the chatbot prompt: instructions, the full recall table, then the question.
///
/// The table goes in verbatim, one record per line with ` | ` between cells.
pub fn build_prompt(table: &RecallTable, question: &str) -> String {
    format!(
        "{PREAMBLE}\n\nHere is the recall data:\n{}\n\nUser Question: {question}",
        table.to_delimited()
    )
}
