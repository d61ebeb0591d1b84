use prefillbench_types::{ModelConfig, TestCase};

/// The built-in suite: three prefill experiments covering steered
/// preference and structured-output extraction.
pub fn default_test_cases() -> Vec<TestCase> {
    const PRODUCT_BLURB: &str = "The SmartHome Mini is a compact smart home assistant available in black or white for only $49.99. At just 5 inches wide, it lets you control lights, thermostats, and other connected devices via voice or app—no matter where you place it in your home. This affordable little hub brings convenient hands-free control to your smart devices.";

    vec![
        TestCase::new(
            "Forced Preference Test",
            "What is your favorite color?",
            vec![
                "If I had to pick, it would be green because".to_string(),
                "If I had to pick, it would be red because".to_string(),
            ],
        ),
        TestCase::new(
            "Formatting (XML)",
            format!(
                "Extract the name, size, price, and color from this product description as an XML object:\n{PRODUCT_BLURB}"
            ),
            vec!["<product>".to_string(), "<product_description>".to_string()],
        ),
        TestCase::new(
            "Formatting (JSON)",
            format!(
                "Extract the name, size, price, and color from this product description as a JSON object:\n{PRODUCT_BLURB}"
            ),
            vec!["{".to_string()],
        ),
    ]
}

/// The built-in model list. Fireworks-hosted models keep their developer
/// tag and route via the `provider` override.
pub fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new("gpt-4o", "openai"),
        ModelConfig::new("gpt-4o-mini", "openai"),
        ModelConfig::new("claude-3-5-sonnet-latest", "anthropic"),
        ModelConfig::new("claude-3-5-haiku-latest", "anthropic"),
        ModelConfig::new("mistral-large-latest", "mistral"),
        ModelConfig::with_provider(
            "accounts/fireworks/models/llama-v3p1-70b-instruct",
            "meta",
            "fireworks",
        ),
        ModelConfig::with_provider(
            "accounts/fireworks/models/qwen2p5-72b-instruct",
            "alibaba",
            "fireworks",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_suite_shape() {
        let cases = default_test_cases();
        let models = default_models();
        assert_eq!(cases.len(), 3);
        assert_eq!(models.len(), 7);

        let prefix_total: usize = cases.iter().map(|c| c.prefixes.len()).sum();
        assert_eq!(prefix_total, 5);
        // 5 prefixes × 7 models
        let combinations: usize = cases.iter().map(|c| c.prefixes.len() * models.len()).sum();
        assert_eq!(combinations, 35);
    }

    #[test]
    fn fireworks_models_route_by_override() {
        let models = default_models();
        let llama = models.iter().find(|m| m.developer == "meta").unwrap();
        assert_eq!(llama.routing_tag(), "fireworks");
        let qwen = models.iter().find(|m| m.developer == "alibaba").unwrap();
        assert_eq!(qwen.routing_tag(), "fireworks");
    }
}
