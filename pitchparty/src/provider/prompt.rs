//! Randomised structured prompt inputs.
//!
//! Each bundle asks the model for a business idea and for two image prompts.
//! The inputs are drawn at random from fixed vocabularies so consecutive
//! bundles differ, then serialised to JSON and wrapped in an instruction.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;

use super::types::{ProviderError, TextPrompt};

/// Sampling temperature for all creative prompts.
pub const CREATIVE_TEMPERATURE: f32 = 0.9;

/// Token cap for image-prompt generation.
pub const IMAGE_PROMPT_MAX_TOKENS: u32 = 300;

/// Delimiter the business-idea response must contain.
pub const SLOGAN_DELIMITER: &str = "Slogan:";

/// Optional prefix of the business-idea response.
pub const NAME_PREFIX: &str = "Name:";

const BUSINESS_TYPES: &[&str] = &[
    "a mobile app",
    "a subscription box",
    "a gourmet food truck",
    "a line of smart home devices",
    "a bespoke tailoring service",
    "a virtual reality arcade",
    "an artisanal coffee shop",
    "a pet psychic agency",
    "a zero-gravity yoga studio",
];

const TARGET_AUDIENCES: &[&str] = &[
    "time-traveling tourists",
    "sentient houseplants",
    "retired superheroes",
    "aliens on vacation",
    "ghosts with unfinished business",
    "zombies who are into personal growth",
    "dolphins who want to be web developers",
    "cats who are learning to code",
    "very-online vampires",
];

const ABSURD_PROBLEMS: &[&str] = &[
    "socks that are always lonely",
    "pigeons that are too loud",
    "a toaster with an attitude problem",
    "the existential dread of a Roomba",
    "lost TV remotes",
    "dreams that are too boring",
    "awkward silences in elevators",
    "when your pet starts talking about philosophy",
    "running out of things to watch on streaming services",
];

const CHARACTER_AGES: &[&str] = &["child", "teenager", "adult", "middle-aged", "elderly"];

const SETTINGS: &[&str] = &[
    "unexpected public place",
    "outer space",
    "underwater",
    "historic era",
    "corporate office",
    "dreamlike zone",
];

const ABSURD_TWISTS: &[&str] = &[
    "prop or situation that contradicts logic or expectations",
    "a mundane task performed in an extreme environment",
    "animals behaving like humans in a specific, detailed way",
    "a historical figure using modern technology",
    "an inanimate object coming to life with a strong personality",
];

const BUSINESS_IDEA_INSTRUCTIONS: &str = "Generate a fake, humorous business name and a slogan \
    for it based on the fields above. Return it as 'Name: <name> Slogan: <slogan>'";

const IMAGE_PROMPT_INSTRUCTIONS: &str = "[Write a single, richly detailed, photorealistic image \
    prompt for a SFW AI image generator. It should use these fields to describe a vivid, absurd \
    and comedic scene. The description must be specific, visual, and funny, like something from \
    a dream or a comedy sketch. Avoid clichés, generic phrasing and jokes involving suicide.]";

/// Structured inputs for the business-idea prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessIdeaInputs {
    pub business_type: &'static str,
    pub target_audience: &'static str,
    pub absurd_problem: &'static str,
    pub instructions: &'static str,
}

impl BusinessIdeaInputs {
    /// Draws a random combination of inputs.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            business_type: pick(BUSINESS_TYPES, rng),
            target_audience: pick(TARGET_AUDIENCES, rng),
            absurd_problem: pick(ABSURD_PROBLEMS, rng),
            instructions: BUSINESS_IDEA_INSTRUCTIONS,
        }
    }
}

/// Structured inputs for an image prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePromptInputs {
    pub character_age_range: &'static str,
    pub setting: &'static str,
    pub absurd_twist: &'static str,
    pub visual_style: &'static str,
    pub final_prompt: &'static str,
}

impl ImagePromptInputs {
    /// Draws a random combination of inputs.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            character_age_range: pick(CHARACTER_AGES, rng),
            setting: pick(SETTINGS, rng),
            absurd_twist: pick(ABSURD_TWISTS, rng),
            visual_style: "photorealistic",
            final_prompt: IMAGE_PROMPT_INSTRUCTIONS,
        }
    }
}

/// Builds a fresh business-idea prompt.
pub fn business_idea_prompt() -> Result<TextPrompt, ProviderError> {
    let inputs = BusinessIdeaInputs::random(&mut rand::rng());
    TextPrompt::from_inputs(
        "Based on the following JSON, fulfill the instructions:",
        &inputs,
        CREATIVE_TEMPERATURE,
    )
}

/// Builds a fresh image-prompt prompt.
pub fn image_prompt() -> Result<TextPrompt, ProviderError> {
    let inputs = ImagePromptInputs::random(&mut rand::rng());
    Ok(TextPrompt::from_inputs(
        "Based on the following JSON, generate the 'final_prompt':",
        &inputs,
        CREATIVE_TEMPERATURE,
    )?
    .with_max_output_tokens(IMAGE_PROMPT_MAX_TOKENS))
}

fn pick<R: Rng + ?Sized>(options: &'static [&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}
