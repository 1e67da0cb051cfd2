//! Keyword lookup from obsession text to coping strategies.
//!
//! An ordered table of `(keyword, strategies)` pairs. Matching is a
//! case-insensitive substring test and the first matching row wins.

const CONTAMINATION: &[&str] = &[
    "Mindfulness",
    "Gradual Exposure",
    "Hand-washing control",
    "Cognitive Restructuring",
    "Delayed Response Strategy",
];

const HARM: &[&str] = &[
    "Thought Defusion",
    "Reality Checking",
    "Exposure Therapy",
    "Cognitive Reframing",
    "Mindfulness-Based Anxiety Reduction",
];

const CHECKING: &[&str] = &[
    "Limiting Checking",
    "Confidence Building",
    "Postpone Checking",
    "Journaling Assurances",
    "Reducing Ritual Frequency",
];

const INTRUSIVE: &[&str] = &[
    "Cognitive Defusion",
    "Exposure & Response Prevention (ERP)",
    "Thought Labeling",
    "Letting Thoughts Pass Without Judgment",
    "Reducing Reassurance Seeking",
];

/// Shown when no keyword matches.
pub const GENERAL_STRATEGIES: &[&str] = &[
    "Practice deep breathing",
    "Use mindfulness techniques",
    "Challenge negative thoughts",
    "Seek support when needed",
];

/// Lower-case keywords, checked in order.
pub const SUGGESTIONS: &[(&str, &[&str])] = &[
    ("contamina", CONTAMINATION),
    ("clean", CONTAMINATION),
    ("germ", CONTAMINATION),
    ("dirt", CONTAMINATION),
    ("wash", CONTAMINATION),
    ("harm", HARM),
    ("hurt", HARM),
    ("check", CHECKING),
    ("lock", CHECKING),
    ("intrusive", INTRUSIVE),
    ("thought", INTRUSIVE),
];

/// Strategies for the first keyword found in `obsession`, if any.
pub fn strategies_for(obsession: &str) -> Option<&'static [&'static str]> {
    let text = obsession.to_lowercase();
    SUGGESTIONS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, strategies)| *strategies)
}

/// Like [`strategies_for`], falling back to [`GENERAL_STRATEGIES`].
pub fn suggest(obsession: &str) -> &'static [&'static str] {
    strategies_for(obsession).unwrap_or(GENERAL_STRATEGIES)
}
