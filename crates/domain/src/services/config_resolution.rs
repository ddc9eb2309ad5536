//! Tenant configuration resolution.
//!
//! Merges a tenant's key/value text settings and its typed behavioral
//! profile into one [`BotConfig`]. Precedence is explicit: a profile field,
//! when present, overrides the same-named settings key.

use std::collections::HashMap;

use crate::models::{BotConfig, BotProfile};

/// Settings keys recognized by the resolver. Unknown keys are ignored
/// rather than rejected, so the settings page can grow ahead of the engine.
const KEY_DEFAULT_REPLY: &str = "default_reply";
const KEY_AI_ENABLED: &str = "ai_enabled";
const KEY_AI_PROMPT: &str = "ai_prompt";
const KEY_HANDOVER_ENABLED: &str = "handover_enabled";
const KEY_HANDOVER_KEYWORD: &str = "handover_keyword";
const KEY_HANDOVER_MESSAGE: &str = "handover_message";
const KEY_OUT_OF_HOURS_ENABLED: &str = "out_of_hours_reply_enabled";
const KEY_OUT_OF_HOURS_MESSAGE: &str = "out_of_hours_message";
const KEY_WEEKDAY_START: &str = "work_hours_weekday_start";
const KEY_WEEKDAY_END: &str = "work_hours_weekday_end";
const KEY_WEEKEND_START: &str = "work_hours_weekend_start";
const KEY_WEEKEND_END: &str = "work_hours_weekend_end";

/// Parses a settings-table boolean. The settings page stores strings.
fn setting_bool(settings: &HashMap<String, String>, key: &str) -> Option<bool> {
    settings.get(key).map(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )
    })
}

fn setting_text(settings: &HashMap<String, String>, key: &str) -> Option<String> {
    settings
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Resolves the effective configuration for one tenant.
///
/// The settings mapping forms the base layer; profile fields that are
/// present override it. A tenant without a profile row passes `None` and
/// gets the settings as-is.
pub fn resolve_bot_config(
    settings: &HashMap<String, String>,
    profile: Option<&BotProfile>,
) -> BotConfig {
    let mut config = BotConfig {
        default_reply: setting_text(settings, KEY_DEFAULT_REPLY),
        ai_enabled: setting_bool(settings, KEY_AI_ENABLED).unwrap_or(false),
        ai_prompt: setting_text(settings, KEY_AI_PROMPT),
        handover_enabled: setting_bool(settings, KEY_HANDOVER_ENABLED).unwrap_or(false),
        handover_keyword: setting_text(settings, KEY_HANDOVER_KEYWORD),
        handover_message: setting_text(settings, KEY_HANDOVER_MESSAGE),
        out_of_hours_reply_enabled: setting_bool(settings, KEY_OUT_OF_HOURS_ENABLED)
            .unwrap_or(false),
        out_of_hours_message: setting_text(settings, KEY_OUT_OF_HOURS_MESSAGE),
        work_hours_weekday_start: setting_text(settings, KEY_WEEKDAY_START),
        work_hours_weekday_end: setting_text(settings, KEY_WEEKDAY_END),
        work_hours_weekend_start: setting_text(settings, KEY_WEEKEND_START),
        work_hours_weekend_end: setting_text(settings, KEY_WEEKEND_END),
        spam_message_limit: None,
        spam_window_secs: None,
    };

    let Some(profile) = profile else {
        return config;
    };

    if let Some(v) = profile.ai_enabled {
        config.ai_enabled = v;
    }
    if let Some(v) = &profile.ai_prompt {
        config.ai_prompt = Some(v.clone());
    }
    if let Some(v) = profile.handover_enabled {
        config.handover_enabled = v;
    }
    if let Some(v) = &profile.handover_keyword {
        config.handover_keyword = Some(v.clone());
    }
    if let Some(v) = &profile.handover_message {
        config.handover_message = Some(v.clone());
    }
    if let Some(v) = profile.out_of_hours_reply_enabled {
        config.out_of_hours_reply_enabled = v;
    }
    if let Some(v) = &profile.out_of_hours_message {
        config.out_of_hours_message = Some(v.clone());
    }
    if let Some(v) = &profile.work_hours_weekday_start {
        config.work_hours_weekday_start = Some(v.clone());
    }
    if let Some(v) = &profile.work_hours_weekday_end {
        config.work_hours_weekday_end = Some(v.clone());
    }
    if let Some(v) = &profile.work_hours_weekend_start {
        config.work_hours_weekend_start = Some(v.clone());
    }
    if let Some(v) = &profile.work_hours_weekend_end {
        config.work_hours_weekend_end = Some(v.clone());
    }
    if let Some(v) = profile.spam_message_limit {
        config.spam_message_limit = u32::try_from(v).ok();
    }
    if let Some(v) = profile.spam_window_secs {
        config.spam_window_secs = u64::try_from(v).ok();
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_empty_inputs() {
        let config = resolve_bot_config(&HashMap::new(), None);
        assert_eq!(config, BotConfig::default());
    }

    #[test]
    fn test_resolve_settings_only() {
        let settings = settings(&[
            ("default_reply", "Anlamadım"),
            ("ai_enabled", "true"),
            ("work_hours_weekday_start", "09:00"),
        ]);
        let config = resolve_bot_config(&settings, None);
        assert_eq!(config.default_reply.as_deref(), Some("Anlamadım"));
        assert!(config.ai_enabled);
        assert_eq!(config.work_hours_weekday_start.as_deref(), Some("09:00"));
    }

    #[test]
    fn test_profile_overrides_settings() {
        let settings = settings(&[("ai_enabled", "true"), ("ai_prompt", "old prompt")]);
        let profile = BotProfile {
            ai_enabled: Some(false),
            ai_prompt: Some("new prompt".into()),
            ..Default::default()
        };
        let config = resolve_bot_config(&settings, Some(&profile));
        assert!(!config.ai_enabled);
        assert_eq!(config.ai_prompt.as_deref(), Some("new prompt"));
    }

    #[test]
    fn test_profile_gaps_fall_back_to_settings() {
        let settings = settings(&[("handover_keyword", "operatör")]);
        let profile = BotProfile {
            handover_enabled: Some(true),
            ..Default::default()
        };
        let config = resolve_bot_config(&settings, Some(&profile));
        assert!(config.handover_enabled);
        assert_eq!(config.handover_keyword.as_deref(), Some("operatör"));
    }

    #[test]
    fn test_blank_setting_values_are_ignored() {
        let settings = settings(&[("default_reply", "   ")]);
        let config = resolve_bot_config(&settings, None);
        assert_eq!(config.default_reply, None);
    }

    #[test]
    fn test_boolean_setting_variants() {
        for truthy in ["true", "1", "yes", "ON", "True"] {
            let s = settings(&[("ai_enabled", truthy)]);
            assert!(resolve_bot_config(&s, None).ai_enabled, "{truthy}");
        }
        for falsy in ["false", "0", "off", "anything"] {
            let s = settings(&[("ai_enabled", falsy)]);
            assert!(!resolve_bot_config(&s, None).ai_enabled, "{falsy}");
        }
    }

    #[test]
    fn test_spam_fields_come_only_from_profile() {
        let profile = BotProfile {
            spam_message_limit: Some(10),
            spam_window_secs: Some(60),
            ..Default::default()
        };
        let config = resolve_bot_config(&HashMap::new(), Some(&profile));
        assert_eq!(config.spam_message_limit, Some(10));
        assert_eq!(config.spam_window_secs, Some(60));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let settings = settings(&[("brand_color", "#ff0000")]);
        let config = resolve_bot_config(&settings, None);
        assert_eq!(config, BotConfig::default());
    }
}
