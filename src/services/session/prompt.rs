use super::types::Turn;

/// Renders the full prompt handed to the knowledge retriever: the system
/// instruction, every turn as `"<Role>: <content>"`, then the trailing
/// `"Assistant:"` cue the model completes.
pub fn render_prompt(system_instruction: &str, history: &[Turn]) -> String {
    let mut prompt = String::with_capacity(
        system_instruction.len()
            + history
                .iter()
                .map(|turn| turn.content.len() + 12)
                .sum::<usize>()
            + 16,
    );

    prompt.push_str(system_instruction);
    prompt.push('\n');
    for turn in history {
        prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
    }
    prompt.push_str("Assistant:");
    prompt
}
