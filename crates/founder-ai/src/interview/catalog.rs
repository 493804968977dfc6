use super::domain::{AnswerKind, ChoiceOption, OptionSource, Question, VisibilityRule};
use std::fmt;

/// Authoring mistakes caught when a catalog is constructed.
///
/// `Display` and `Error` are implemented by hand because the `source` fields
/// below name an earlier question, not an error cause, which thiserror's
/// derive would otherwise assume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateQuestionId(&'static str),
    GateNotEarlier {
        question: &'static str,
        reference: &'static str,
    },
    OptionSourceNotEarlier {
        question: &'static str,
        source: &'static str,
    },
    OptionSourceNotMultiSelect {
        question: &'static str,
        source: &'static str,
    },
    MissingOptions(&'static str),
    UnexpectedOptions(&'static str),
    DuplicateOptionValue {
        question: &'static str,
        value: &'static str,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateQuestionId(id) => {
                write!(f, "duplicate question id '{id}'")
            }
            CatalogError::GateNotEarlier {
                question,
                reference,
            } => write!(
                f,
                "question '{question}' is gated on '{reference}', which is not declared earlier"
            ),
            CatalogError::OptionSourceNotEarlier { question, source } => write!(
                f,
                "question '{question}' draws options from '{source}', which is not declared earlier"
            ),
            CatalogError::OptionSourceNotMultiSelect { question, source } => write!(
                f,
                "question '{question}' draws options from '{source}', which is not a multi select"
            ),
            CatalogError::MissingOptions(id) => {
                write!(f, "choice question '{id}' declares no options")
            }
            CatalogError::UnexpectedOptions(id) => {
                write!(f, "question '{id}' takes typed input but declares options")
            }
            CatalogError::DuplicateOptionValue { question, value } => write!(
                f,
                "question '{question}' declares option value '{value}' more than once"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Ordered, immutable set of questions making up one interview flow.
///
/// Construction validates the authored data so that every rule failure is a
/// `CatalogError` here instead of a dead end mid-interview: ids are unique,
/// gates and dynamic option sources only ever look backward, and option
/// arity matches each question's kind.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        let mut declared: Vec<&'static str> = Vec::with_capacity(questions.len());

        for question in &questions {
            if declared.contains(&question.id) {
                return Err(CatalogError::DuplicateQuestionId(question.id));
            }

            if let Some(reference) = question.visibility.references() {
                if !declared.contains(&reference) {
                    return Err(CatalogError::GateNotEarlier {
                        question: question.id,
                        reference,
                    });
                }
            }

            match question.kind {
                AnswerKind::SingleChoice | AnswerKind::MultiSelect => {
                    Self::check_choice_options(question, &declared, &questions)?
                }
                AnswerKind::Numeric | AnswerKind::FreeText => match question.options {
                    OptionSource::Static(options) if options.is_empty() => {}
                    _ => return Err(CatalogError::UnexpectedOptions(question.id)),
                },
            }

            declared.push(question.id);
        }

        Ok(Self { questions })
    }

    fn check_choice_options(
        question: &Question,
        declared: &[&'static str],
        questions: &[Question],
    ) -> Result<(), CatalogError> {
        match question.options {
            OptionSource::Static(options) => {
                if options.is_empty() {
                    return Err(CatalogError::MissingOptions(question.id));
                }
                let mut values: Vec<&'static str> = Vec::with_capacity(options.len());
                for option in options {
                    if values.contains(&option.value) {
                        return Err(CatalogError::DuplicateOptionValue {
                            question: question.id,
                            value: option.value,
                        });
                    }
                    values.push(option.value);
                }
                Ok(())
            }
            OptionSource::SelectionsOf { source } => {
                if !declared.contains(&source) {
                    return Err(CatalogError::OptionSourceNotEarlier {
                        question: question.id,
                        source,
                    });
                }
                let feeds_from = questions
                    .iter()
                    .find(|earlier| earlier.id == source)
                    .map(|earlier| earlier.kind);
                if feeds_from != Some(AnswerKind::MultiSelect) {
                    return Err(CatalogError::OptionSourceNotMultiSelect {
                        question: question.id,
                        source,
                    });
                }
                Ok(())
            }
            OptionSource::Custom(_) => Ok(()),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The founder onboarding flow shipped with this service.
    ///
    /// Traction, revenue, and fundraising follow-ups unlock from earlier
    /// answers; `value_impact` re-derives its options from the capabilities
    /// selected under `core_features`.
    pub fn founder_onboarding() -> Self {
        let questions = vec![
            Question {
                id: "company_focus",
                prompt: "What are you building?",
                subtext: Some("Pick the closest fit; this steers the rest of the interview."),
                disclaimer: None,
                insight: None,
                kind: AnswerKind::SingleChoice,
                options: OptionSource::Static(const {
                    &[
                        ChoiceOption::new("b2b_saas", "B2B SaaS"),
                        ChoiceOption::new("marketplace", "Marketplace"),
                        ChoiceOption::new("devtools", "Developer tools"),
                        ChoiceOption::new("consumer", "Consumer app"),
                        ChoiceOption::new("services", "Productized services"),
                    ]
                }),
                visibility: VisibilityRule::Always,
                signal_tags: &["market-segment"],
            },
            Question {
                id: "product_stage",
                prompt: "Where is the product today?",
                subtext: None,
                disclaimer: None,
                insight: None,
                kind: AnswerKind::SingleChoice,
                options: OptionSource::Static(const {
                    &[
                        ChoiceOption::new("idea", "Just an idea"),
                        ChoiceOption::new("prototype", "Working prototype"),
                        ChoiceOption::new("beta", "Private beta"),
                        ChoiceOption::new("live", "Live and in production"),
                    ]
                }),
                visibility: VisibilityRule::Always,
                signal_tags: &["maturity"],
            },
            Question {
                id: "has_customers",
                prompt: "Do you have paying customers yet?",
                subtext: None,
                disclaimer: None,
                insight: Some("Most teams onboarding here are pre-revenue; honest answers beat optimistic ones."),
                kind: AnswerKind::SingleChoice,
                options: OptionSource::Static(const {
                    &[
                        ChoiceOption::new("no", "Not yet"),
                        ChoiceOption::new("early", "A few early adopters"),
                        ChoiceOption::new("yes", "Yes, paying customers"),
                    ]
                }),
                visibility: VisibilityRule::Always,
                signal_tags: &["traction"],
            },
            Question {
                id: "mrr",
                prompt: "What is your monthly recurring revenue in USD?",
                subtext: None,
                disclaimer: Some("Revenue figures stay private to your workspace."),
                insight: None,
                kind: AnswerKind::Numeric,
                options: OptionSource::none(),
                visibility: VisibilityRule::AnswerEquals {
                    question: "has_customers",
                    value: "yes",
                },
                signal_tags: &["revenue", "traction"],
            },
            Question {
                id: "customer_count",
                prompt: "How many customers actively use the product?",
                subtext: None,
                disclaimer: None,
                insight: None,
                kind: AnswerKind::Numeric,
                options: OptionSource::none(),
                visibility: VisibilityRule::AnswerAmong {
                    question: "has_customers",
                    any_of: &["early", "yes"],
                },
                signal_tags: &["traction"],
            },
            Question {
                id: "growth_channel",
                prompt: "Which channel brings in most of your new customers?",
                subtext: None,
                disclaimer: None,
                insight: Some("Founder-led sales is the most common answer at this stage."),
                kind: AnswerKind::SingleChoice,
                options: OptionSource::Static(const {
                    &[
                        ChoiceOption::new("founder_sales", "Founder-led sales"),
                        ChoiceOption::new("content", "Content and SEO"),
                        ChoiceOption::new("paid_acquisition", "Paid acquisition"),
                        ChoiceOption::new("partnerships", "Partnerships"),
                        ChoiceOption::new("community", "Community"),
                    ]
                }),
                visibility: VisibilityRule::AnswerAmong {
                    question: "has_customers",
                    any_of: &["early", "yes"],
                },
                signal_tags: &["distribution"],
            },
            Question {
                id: "core_features",
                prompt: "Which capabilities form the core of your product?",
                subtext: Some("Select every capability that ships today."),
                disclaimer: None,
                insight: None,
                kind: AnswerKind::MultiSelect,
                options: OptionSource::Static(const {
                    &[
                        ChoiceOption::new("analytics", "Analytics"),
                        ChoiceOption::new("automation", "Automation"),
                        ChoiceOption::new("collaboration", "Collaboration"),
                        ChoiceOption::new("integrations", "Integrations"),
                        ChoiceOption::new("reporting", "Reporting"),
                    ]
                }),
                visibility: VisibilityRule::Always,
                signal_tags: &["product-shape"],
            },
            Question {
                id: "value_impact",
                prompt: "Which of those capabilities delivers the most customer value?",
                subtext: Some("Options reflect your previous selections."),
                disclaimer: None,
                insight: None,
                kind: AnswerKind::SingleChoice,
                options: OptionSource::SelectionsOf {
                    source: "core_features",
                },
                visibility: VisibilityRule::Always,
                signal_tags: &["value-prop"],
            },
            Question {
                id: "team_size",
                prompt: "How many people work on the company full time, founders included?",
                subtext: None,
                disclaimer: None,
                insight: None,
                kind: AnswerKind::Numeric,
                options: OptionSource::none(),
                visibility: VisibilityRule::Always,
                signal_tags: &["team"],
            },
            Question {
                id: "fundraising_stage",
                prompt: "How is the company funded today?",
                subtext: None,
                disclaimer: None,
                insight: None,
                kind: AnswerKind::SingleChoice,
                options: OptionSource::Static(const {
                    &[
                        ChoiceOption::new("bootstrapped", "Bootstrapped"),
                        ChoiceOption::new("angel", "Angel backed"),
                        ChoiceOption::new("seed", "Seed"),
                        ChoiceOption::new("series_a", "Series A"),
                    ]
                }),
                visibility: VisibilityRule::Always,
                signal_tags: &["capital"],
            },
            Question {
                id: "raise_target",
                prompt: "How much are you looking to raise in this round, in USD?",
                subtext: Some("A rough target is fine."),
                disclaimer: None,
                insight: None,
                kind: AnswerKind::Numeric,
                options: OptionSource::none(),
                visibility: VisibilityRule::AnswerAmong {
                    question: "fundraising_stage",
                    any_of: &["angel", "seed", "series_a"],
                },
                signal_tags: &["capital"],
            },
            Question {
                id: "vision",
                prompt: "Where do you want the company to be in five years?",
                subtext: None,
                disclaimer: None,
                insight: Some("This feeds the narrative section of your profile."),
                kind: AnswerKind::FreeText,
                options: OptionSource::none(),
                visibility: VisibilityRule::Always,
                signal_tags: &["narrative"],
            },
        ];

        Self::new(questions).expect("founder onboarding catalog is well formed")
    }
}
