//! System prompt rendering for the operations agent

use crate::domain::entities::{StudioContext, WorkingMemory};

const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are the CRM operations agent for {{STUDIO_NAME}}, a photography studio.

## How to work
For every request:
1. Look up current records with the read and search tools before stating any fact.
2. Decide the exact action needed (create, update, email, schedule).
3. Run the matching action tool with accurate data.
4. Report what was done, with specifics.

## Policy
- Mode: {{POLICY_MODE}}
- Authorities: {{POLICY_AUTHORITIES_CSV}}
- Approval limit: {{POLICY_AMOUNT_LIMIT}} {{STUDIO_CURRENCY}}
Propose anything above {{POLICY_AMOUNT_LIMIT}} {{STUDIO_CURRENCY}} for approval instead of executing it.

## Working memory
[[WORKING_MEMORY]]
Keep current_goal, selected_client_id and last_action up to date with update_memory when the context changes.

## Grounding
- When the user gives a name or partial name, search for it first.
- When exactly one record matches and an action is requested, act on that record.
- When a tool returns an error object, adapt: try another tool or ask for the missing field, and say why.
- Chain steps without asking ("email Simon" means find Simon, draft, send).

## Style
Decisive and concise. Report exactly what was accomplished and surface tool errors plainly."#;

/// Fill the system prompt template from studio policy and working memory
pub fn render_system_prompt(studio: &StudioContext, memory: &WorkingMemory) -> String {
    let memory_json = serde_json::to_string(memory).unwrap_or_else(|_| "{}".to_string());

    SYSTEM_PROMPT_TEMPLATE
        .replace("{{STUDIO_NAME}}", &studio.studio_name)
        .replace("{{POLICY_MODE}}", &studio.policy.mode.to_string())
        .replace("{{POLICY_AUTHORITIES_CSV}}", &studio.policy.authorities_csv())
        .replace(
            "{{POLICY_AMOUNT_LIMIT}}",
            &format_amount(studio.policy.approval_required_over_amount),
        )
        .replace("{{STUDIO_CURRENCY}}", &studio.currency)
        .replace("[[WORKING_MEMORY]]", &memory_json)
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}
