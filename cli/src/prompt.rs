/// Fixed analysis prompt. `{logs}` is replaced with the raw log text; the
/// brace-heavy block below is the literal schema the model is asked to emit.
const TEMPLATE: &str = r#"
You are a senior cybersecurity analyst. Analyze the following server access logs.
Identify any suspicious behavior, cyber threats, or vulnerabilities.

Server Logs:
{logs}

Provide your analysis in the following JSON format ONLY. Do not include markdown formatting like ```json.
{
    "threats_detected": [
        {
            "ip_address": "string",
            "vulnerability_type": "string",
            "risk_level": "Low, Medium, High, or Critical",
            "evidence": "string (the exact log line)",
            "mitigation_strategy": "string"
        }
    ]
}
"#;

// Literal insertion, no escaping or truncation; oversized input is left to the
// remote service's own limits.
pub fn build_prompt(logs: &str) -> String {
    TEMPLATE.replace("{logs}", logs)
}
