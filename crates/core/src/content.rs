//! Static lesson material shown on the display-only stages.

/// A vocabulary entry with its definition and an example sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabItem {
    pub word: &'static str,
    pub definition: &'static str,
    pub example: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonContent {
    pub cefr_level: &'static str,
    pub topic: &'static str,
    pub introduction: &'static str,
    pub vocabulary: Vec<VocabItem>,
    pub article: Vec<&'static str>,
    pub discussion_topics: Vec<&'static str>,
}

impl LessonContent {
    /// The "Banning Junk Food from SNAP" lesson.
    pub fn snap_junk_food() -> Self {
        Self {
            cefr_level: "B1-high",
            topic: "Banning Junk Food from SNAP",
            introduction: "In this lesson, we will practice important vocabulary, read an article, and discuss the implications of banning junk food from SNAP.",
            vocabulary: vec![
                VocabItem {
                    word: "strip",
                    definition: "to remove or take something away",
                    example: "The school is stripping art classes from the curriculum.",
                },
                VocabItem {
                    word: "vocal",
                    definition: "expressing opinions openly",
                    example: "Many people are vocal on social media.",
                },
                VocabItem {
                    word: "administer",
                    definition: "to manage or organize something",
                    example: "The scholarship program is administered by the university.",
                },
                VocabItem {
                    word: "autonomy",
                    definition: "the ability to make your own decisions",
                    example: "The teacher encourages autonomy in learning.",
                },
                VocabItem {
                    word: "dignity",
                    definition: "the quality of being respected",
                    example: "The workers demanded to be treated with dignity.",
                },
            ],
            article: vec![
                "A push to ban sugary drinks, candy and more from the U.S. program that helps low-income families pay for nutritious food has been tried before, but it may soon get a boost from new Trump administration officials.",
                "Robert F. Kennedy Jr., the newly confirmed Health and Human Services (HHS) Secretary, and Brooke Rollins, the new Department of Agriculture (USDA) Secretary, have both signaled that they favor stripping such treats from SNAP, the Supplemental Nutrition Assistance Program.",
                "Kennedy has been most vocal, calling for the government to stop allowing the nearly $113 billion program that serves about 42 million Americans to use benefits to pay for 'soda or processed foods.'",
                "Excluding any foods would require Congress to change the law, or for states to submit waivers to restrict purchases.",
                "Anti-hunger advocates say that limiting food choices undermines the autonomy and dignity of people who receive assistance.",
            ],
            discussion_topics: vec![
                "Is it fair for the government to decide what low-income families can buy with food assistance?",
                "Should there be limits on buying 'luxury' food with government assistance?",
            ],
        }
    }

    /// Comma-separated vocabulary words for the summary stage.
    pub fn key_vocabulary(&self) -> String {
        self.vocabulary
            .iter()
            .map(|item| item.word)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
