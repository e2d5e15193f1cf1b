//! Synthetic post content.

mod words;

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::posts::Post;
use words::{ABBREVIATIONS, ADJECTIVES, ING_VERBS, NOUNS, PHRASES, VERBS};

/// Source of new posts for the seeded list and the archive.
pub trait PostGenerator {
    fn generate(&mut self) -> Post;
}

impl<F> PostGenerator for F
where
    F: FnMut() -> Post,
{
    fn generate(&mut self) -> Post {
        self()
    }
}

/// Produces `"<adjective> <noun>"` titles and hacker-jargon sentences.
pub struct HackerPostGenerator {
    rng: StdRng,
}

impl HackerPostGenerator {
    /// A deterministic generator when `seed` is set, an entropy-seeded one otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    fn pick(&mut self, words: &'static [&'static str]) -> &'static str {
        words.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn title(&mut self) -> String {
        format!("{} {}", self.pick(ADJECTIVES), self.pick(NOUNS))
    }

    fn phrase(&mut self) -> String {
        let template = self.pick(PHRASES);
        let mut phrase = String::with_capacity(template.len() * 2);
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            phrase.push_str(&rest[..open]);
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            let slot = &rest[open + 1..open + close];
            let word = match slot {
                "abbreviation" => self.pick(ABBREVIATIONS),
                "adjective" => self.pick(ADJECTIVES),
                "noun" => self.pick(NOUNS),
                "verb" => self.pick(VERBS),
                "ing_verb" => self.pick(ING_VERBS),
                _ => "",
            };
            phrase.push_str(word);
            rest = &rest[open + close + 1..];
        }
        phrase.push_str(rest);

        capitalize_first(&phrase)
    }
}

impl PostGenerator for HackerPostGenerator {
    fn generate(&mut self) -> Post {
        let title = self.title();
        let body = self.phrase();
        Post::new(title, body)
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_generators_agree() {
        let mut left = HackerPostGenerator::new(Some(7));
        let mut right = HackerPostGenerator::new(Some(7));

        for _ in 0..20 {
            assert_eq!(left.generate(), right.generate());
        }
    }

    #[test]
    fn phrases_have_every_slot_filled() {
        let mut generator = HackerPostGenerator::new(Some(42));

        for _ in 0..200 {
            let post = generator.generate();
            assert!(!post.title.is_empty());
            assert!(post.title.contains(' '));
            assert!(!post.body.contains('{'), "unfilled slot in {:?}", post.body);
            assert!(!post.body.contains('}'), "unfilled slot in {:?}", post.body);
            assert!(post.body.ends_with('!'));
        }
    }

    #[test]
    fn phrases_start_with_a_capital_letter() {
        let mut generator = HackerPostGenerator::new(Some(3));

        for _ in 0..50 {
            let body = generator.generate().body;
            let first = body.chars().next().expect("non-empty phrase");
            assert!(!first.is_lowercase(), "{body}");
        }
    }

    #[test]
    fn closures_are_generators() {
        let mut counter = 0;
        let mut generator = || {
            counter += 1;
            Post::new(format!("post {counter}"), "body")
        };

        assert_eq!(generator.generate().title, "post 1");
        assert_eq!(generator.generate().title, "post 2");
    }
}
