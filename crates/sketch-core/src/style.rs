//! ============================================================================
//! Style Table - Style identifiers to prompt phrases
//! ============================================================================
//! Style validation is lenient: unknown identifiers get a generic phrase
//! instead of an error.
//! ============================================================================

/// Phrase used for any style not in the table
pub const FALLBACK_STYLE_PHRASE: &str = "high quality artistic style";

/// Fixed style table, in presentation order
pub const STYLE_PROMPTS: [(&str, &str); 10] = [
    (
        "realistic",
        "photorealistic, highly detailed, professional photography, natural lighting, 8k quality",
    ),
    (
        "anime",
        "anime style, vibrant colors, Japanese animation aesthetic, cel-shaded, manga inspired",
    ),
    (
        "cartoon",
        "cartoon style, bold colors, playful illustration, animated feel, exaggerated features",
    ),
    (
        "oil-painting",
        "oil painting style, classical art, textured brushstrokes, rich colors, artistic masterpiece",
    ),
    (
        "watercolor",
        "watercolor painting, soft washes, delicate colors, artistic, painted on paper texture",
    ),
    (
        "sketch",
        "detailed pencil sketch, hand-drawn, artistic line work, shading and hatching, graphite drawing",
    ),
    (
        "3d-render",
        "3D rendered, computer graphics, smooth surfaces, professional CGI, octane render, unreal engine",
    ),
    (
        "pixel-art",
        "pixel art style, retro gaming aesthetic, 8-bit or 16-bit graphics, pixelated, sprite art",
    ),
    (
        "cyberpunk",
        "cyberpunk style, neon lights, futuristic, sci-fi aesthetic, dark with bright accents, technological",
    ),
    (
        "fantasy",
        "fantasy art style, magical atmosphere, ethereal, epic illustration, mystical and enchanting",
    ),
];

/// Descriptive phrase for a style identifier
pub fn style_phrase(style: &str) -> &'static str {
    STYLE_PROMPTS
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, phrase)| *phrase)
        .unwrap_or(FALLBACK_STYLE_PHRASE)
}

/// Whether the style has its own table entry
pub fn is_known_style(style: &str) -> bool {
    STYLE_PROMPTS.iter().any(|(name, _)| *name == style)
}

/// Full prompt sent to the model and echoed back to the caller
pub fn build_prompt(style: &str) -> String {
    format!(
        "Transform this sketch into a beautiful image, {}, masterpiece quality, professional artwork",
        style_phrase(style)
    )
}
