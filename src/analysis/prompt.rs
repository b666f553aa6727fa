//! Fixed prompt material for transcript analysis.
//!
//! The system instruction is the contract the remote model is expected to
//! honor: two banners (`CUSTOMER PROFILE SNAPSHOT`, `CALLBACK PLAYBOOK
//! COMPLIANCE AUDIT`), `## ` headings for every section, no invented facts.
//! [`crate::report`] relies on that layout when splitting the response.

/// Default Gemini model identifier.
pub const MODEL_NAME: &str = "gemini-3-flash-preview";

/// Sampling temperature. Low for consistent analytical output.
pub const TEMPERATURE: f32 = 0.2;

/// Nucleus sampling cutoff.
pub const TOP_P: f32 = 0.8;

/// Top-k sampling cutoff.
pub const TOP_K: u32 = 40;

/// Banner title opening the ten-section profile.
pub const SNAPSHOT_BANNER: &str = "CUSTOMER PROFILE SNAPSHOT";

/// Banner title opening the playbook audit.
pub const COMPLIANCE_BANNER: &str = "CALLBACK PLAYBOOK COMPLIANCE AUDIT";

/// System instruction sent with every analysis request.
pub const SYSTEM_INSTRUCTION: &str = "\
# ROLE
You are the \"Customer Callback Intelligence Analyst & Playbook Compliance Auditor.\"

Your job is to analyze customer call transcripts and produce a concise, operator-ready Customer Profile Snapshot.

# OBJECTIVE
Generate:
1) A complete 10-section Customer Profile Snapshot (Callback Intelligence Monitoring Framework).
2) A Callback Playbook Compliance Audit.

# HARD RULES
- Do NOT invent facts. If information is missing, explicitly state \"Unknown.\"
- Support classifications with short direct quotes (≤20 words).
- Use exactly the 10 sections below, in order.
- No emojis.
- Keep output concise and scannable.

# OUTPUT STRUCTURE (FOLLOW EXACTLY)
## CUSTOMER PROFILE SNAPSHOT
---
## SECTION 1: CALL CONTEXT & HISTORY
Identify the core issue and any previous history mentioned.

## SECTION 2: CUSTOMER VIBE & TEMPERAMENT
Describe the customer's emotional state (Frustrated, Cooperative, Urgent, etc.) with a quote.

## SECTION 3: KEY PAIN POINTS & FRICTION
List specific technical or process hurdles the customer faced.

## SECTION 4: COMMITMENTS & PROMISES MADE
Detail what the agent promised (callbacks, refunds, fixes) and the timeline.

## SECTION 5: ACCOUNT & SERVICE DETAILS
Extract any plan types, account numbers, or service tiers mentioned.

## SECTION 6: UNMET NEEDS & GAPS
What did the customer ask for that wasn't addressed or couldn't be done?

## SECTION 7: RISK INDICATORS
Identify churn risk, legal threats, or escalation demands.

## SECTION 8: CUSTOMER PREFERENCES
Communication styles, preferred times for callback, or specific contact methods.

## SECTION 9: TECHNICAL LOGS SUMMARY
If technical data was mentioned, summarize error codes or diagnostic steps.

## SECTION 10: IMMEDIATE NEXT STEPS
Actionable list for the next operator.

# CALLBACK PLAYBOOK COMPLIANCE AUDIT
## A) PLAYBOOK SELECTION
Identify which playbook should have been used based on the issue.

## B) PLAYBOOK EXECUTION CHECK
List what was missed vs what was followed.

## C) COMPLIANCE SUMMARY
Give a Pass/Fail/Partial rating with justification.";

/// Wrap a transcript into the single user message of the request.
///
/// ```
/// use auditpro::analysis::prompt::user_message;
///
/// assert_eq!(user_message("hi"), "Transcript to analyze:\n\nhi");
/// ```
pub fn user_message(transcript: &str) -> String {
    format!("Transcript to analyze:\n\n{transcript}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_names_both_banners() {
        assert!(SYSTEM_INSTRUCTION.contains(&format!("## {SNAPSHOT_BANNER}")));
        assert!(SYSTEM_INSTRUCTION.contains(COMPLIANCE_BANNER));
    }

    #[test]
    fn instruction_lists_ten_sections_in_order() {
        let mut last = 0;
        for n in 1..=10 {
            let marker = format!("## SECTION {n}:");
            let pos = SYSTEM_INSTRUCTION
                .find(&marker)
                .unwrap_or_else(|| panic!("missing {marker}"));
            assert!(pos > last, "{marker} out of order");
            last = pos;
        }
    }

    #[test]
    fn instruction_carries_hard_rules() {
        assert!(SYSTEM_INSTRUCTION.contains("Do NOT invent facts"));
        assert!(SYSTEM_INSTRUCTION.contains("\"Unknown.\""));
        assert!(SYSTEM_INSTRUCTION.contains("(≤20 words)"));
        assert!(SYSTEM_INSTRUCTION.contains("No emojis."));
        assert!(SYSTEM_INSTRUCTION.contains("Pass/Fail/Partial"));
    }

    #[test]
    fn user_message_keeps_transcript_verbatim() {
        let transcript = "Agent: Hello\n  Customer: my router is down  ";
        assert!(user_message(transcript).ends_with(transcript));
    }
}
