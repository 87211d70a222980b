use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::domain::{
    AnswerOption, Question, QuestionId, QuestionKind, QuizType, ResultBucket,
};
use super::matcher::{validate_buckets, BucketConfigError};

/// A configured quiz: ordered weighted questions plus the result buckets they map into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizDefinition {
    pub quiz_type: QuizType,
    pub title: String,
    pub intro: String,
    pub questions: Vec<Question>,
    pub buckets: Vec<ResultBucket>,
}

impl QuizDefinition {
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn question_by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn min_possible_score(&self) -> f64 {
        self.questions
            .iter()
            .map(Question::min_contribution)
            .sum()
    }

    pub fn max_possible_score(&self) -> f64 {
        self.questions
            .iter()
            .map(Question::max_contribution)
            .sum()
    }

    /// Static configuration check: unique ids, usable options, and full bucket coverage.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.questions.is_empty() {
            return Err(CatalogError::NoQuestions(self.quiz_type));
        }

        let mut seen = HashSet::new();
        for question in &self.questions {
            if !seen.insert(&question.id) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            if !question.weight.is_finite() || question.weight < 0.0 {
                return Err(CatalogError::InvalidWeight(question.id.clone()));
            }
            let needs_options = matches!(
                question.kind,
                QuestionKind::MultipleChoice | QuestionKind::MultipleSelect
            );
            if needs_options && question.options.is_empty() {
                return Err(CatalogError::MissingOptions(question.id.clone()));
            }
        }

        validate_buckets(
            &self.buckets,
            self.min_possible_score().min(0.0),
            self.max_possible_score(),
        )
        .map_err(|source| CatalogError::Buckets {
            quiz_type: self.quiz_type,
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("quiz {0} has no questions")]
    NoQuestions(QuizType),
    #[error("question id {0} is used more than once")]
    DuplicateQuestion(QuestionId),
    #[error("question {0} has a negative or non-finite weight")]
    InvalidWeight(QuestionId),
    #[error("question {0} needs at least one option")]
    MissingOptions(QuestionId),
    #[error("quiz {quiz_type} result buckets are misconfigured: {source}")]
    Buckets {
        quiz_type: QuizType,
        source: BucketConfigError,
    },
    #[error("quiz {0} is defined more than once")]
    DuplicateQuiz(QuizType),
}

/// Every quiz shipped with the site, compiled in at build time.
#[derive(Debug, Clone)]
pub struct QuizCatalog {
    quizzes: Vec<Arc<QuizDefinition>>,
}

impl QuizCatalog {
    pub fn standard() -> Self {
        Self {
            quizzes: vec![Arc::new(readiness_quiz()), Arc::new(model_fit_quiz())],
        }
    }

    /// Build a catalog from externally supplied definitions. Each one must pass
    /// [`QuizDefinition::validate`], and a quiz type may appear only once.
    pub fn from_definitions(quizzes: Vec<QuizDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for quiz in &quizzes {
            if !seen.insert(quiz.quiz_type) {
                return Err(CatalogError::DuplicateQuiz(quiz.quiz_type));
            }
            quiz.validate()?;
        }

        Ok(Self {
            quizzes: quizzes.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn definition(&self, quiz_type: QuizType) -> Option<&Arc<QuizDefinition>> {
        self.quizzes
            .iter()
            .find(|quiz| quiz.quiz_type == quiz_type)
    }

    pub fn definitions(&self) -> &[Arc<QuizDefinition>] {
        &self.quizzes
    }
}

impl Default for QuizCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn scale(id: &str, text: &str, weight: f64) -> Question {
    Question {
        id: QuestionId::new(id),
        text: text.to_string(),
        kind: QuestionKind::Scale,
        options: Vec::new(),
        weight,
    }
}

fn boolean(id: &str, text: &str, weight: f64) -> Question {
    Question {
        id: QuestionId::new(id),
        text: text.to_string(),
        kind: QuestionKind::Boolean,
        options: Vec::new(),
        weight,
    }
}

fn with_options(
    kind: QuestionKind,
    id: &str,
    text: &str,
    weight: f64,
    options: Vec<AnswerOption>,
) -> Question {
    Question {
        id: QuestionId::new(id),
        text: text.to_string(),
        kind,
        options,
        weight,
    }
}

fn option(text: &str, value: f64, category: Option<&str>) -> AnswerOption {
    AnswerOption {
        text: text.to_string(),
        value,
        category: category.map(str::to_string),
    }
}

fn bucket(
    range: (f64, f64),
    title: &str,
    description: &str,
    recommendations: &[&str],
    cta: (&str, &str),
) -> ResultBucket {
    ResultBucket {
        min_score: range.0,
        max_score: range.1,
        title: title.to_string(),
        description: description.to_string(),
        recommendations: recommendations.iter().map(|item| item.to_string()).collect(),
        cta_text: cta.0.to_string(),
        cta_link: cta.1.to_string(),
    }
}

fn readiness_quiz() -> QuizDefinition {
    QuizDefinition {
        quiz_type: QuizType::Readiness,
        title: "Da li ste spremni za franšizu?".to_string(),
        intro: "Osam kratkih pitanja o motivaciji, resursima i podršci koju imate.".to_string(),
        questions: vec![
            scale(
                "motivation",
                "Koliko ste motivisani da vodite sopstveni obrazovni centar?",
                2.0,
            ),
            scale(
                "education_passion",
                "Koliko vam je važan rad sa decom i obrazovanje?",
                1.0,
            ),
            scale(
                "leadership",
                "Kako ocenjujete svoje veštine vođenja tima?",
                1.0,
            ),
            boolean(
                "capital",
                "Da li imate obezbeđen početni kapital za ulaganje?",
                2.0,
            ),
            boolean(
                "business_experience",
                "Da li ste ranije vodili sopstveni posao?",
                1.0,
            ),
            scale(
                "local_network",
                "Koliko dobro poznajete roditelje i škole u svom gradu?",
                1.0,
            ),
            scale(
                "time_commitment",
                "Koliko vremena nedeljno možete posvetiti centru?",
                1.0,
            ),
            boolean(
                "family_support",
                "Da li vas porodica podržava u ovoj odluci?",
                1.0,
            ),
        ],
        buckets: vec![
            bucket(
                (0.0, 40.0),
                "Potrebno je više pripreme",
                "Franšiza je dugoročna obaveza. Trenutno vam nedostaje nekoliko ključnih preduslova.",
                &[
                    "Pročitajte vodič o franšiznim modelima",
                    "Razgovarajte sa postojećim partnerima",
                ],
                ("Preuzmite vodič", "/blog/kako-postati-franšizer"),
            ),
            bucket(
                (40.0, 60.0),
                "Imate potencijal",
                "Imate dobru osnovu, ali neke oblasti treba ojačati pre pokretanja centra.",
                &[
                    "Izračunajte potrebnu investiciju",
                    "Prijavite se na informativni webinar",
                ],
                ("Izračunajte investiciju", "/kalkulator-investicije"),
            ),
            bucket(
                (60.0, 80.0),
                "Skoro ste spremni",
                "Većina preduslova je ispunjena. Sledeći korak je razgovor sa našim timom.",
                &[
                    "Uporedite franšizne modele",
                    "Proverite slobodne lokacije",
                ],
                ("Pogledajte modele", "/franšiza/modeli"),
            ),
            bucket(
                (80.0, 100.0),
                "Potpuno ste spremni",
                "Imate motivaciju, resurse i podršku. Vreme je da zakažemo sastanak.",
                &[
                    "Zakažite konsultacije",
                    "Pripremite pitanja o lokaciji i timu",
                ],
                ("Zakažite sastanak", "/kontakt"),
            ),
        ],
    }
}

fn model_fit_quiz() -> QuizDefinition {
    QuizDefinition {
        quiz_type: QuizType::ModelFit,
        title: "Koji franšizni model vam odgovara?".to_string(),
        intro: "Četiri pitanja o budžetu, prostoru, programima i timu.".to_string(),
        questions: vec![
            with_options(
                QuestionKind::MultipleChoice,
                "budget",
                "Koliki budžet planirate za pokretanje centra?",
                1.0,
                vec![
                    option("Do 10.000 €", 2.0, Some("mini")),
                    option("10.000 – 25.000 €", 5.0, Some("standard")),
                    option("25.000 – 50.000 €", 8.0, Some("standard")),
                    option("Preko 50.000 €", 10.0, Some("premium")),
                ],
            ),
            with_options(
                QuestionKind::MultipleChoice,
                "space",
                "Da li imate prostor za centar?",
                1.0,
                vec![
                    option("Još nemam prostor", 2.0, Some("mini")),
                    option("Do 50 m²", 5.0, Some("mini")),
                    option("50 – 100 m²", 8.0, Some("standard")),
                    option("Više od 100 m²", 10.0, Some("premium")),
                ],
            ),
            with_options(
                QuestionKind::MultipleSelect,
                "programs",
                "Koje programe želite da nudite?",
                2.0,
                vec![
                    option("Brzo čitanje", 6.0, Some("literacy")),
                    option("Mentalna aritmetika", 8.0, Some("math")),
                    option("Engleski za decu", 6.0, Some("language")),
                    option("Programiranje", 10.0, Some("stem")),
                ],
            ),
            with_options(
                QuestionKind::MultipleChoice,
                "team",
                "Sa kolikim timom planirate da počnete?",
                1.0,
                vec![
                    option("Radiću samostalno", 3.0, Some("mini")),
                    option("Jedan do dva saradnika", 6.0, Some("standard")),
                    option("Tim od tri ili više predavača", 10.0, Some("premium")),
                ],
            ),
        ],
        buckets: vec![
            bucket(
                (0.0, 20.0),
                "Mini centar",
                "Kompaktan model sa jednim programom, idealan za manji grad ili početak uz posao.",
                &["Krenite sa jednim programom", "Iznajmite učionicu po satu"],
                ("Saznajte više o mini modelu", "/franšiza/modeli/mini"),
            ),
            bucket(
                (20.0, 35.0),
                "Standardni centar",
                "Dve do tri učionice i više programa, najčešći izbor naših partnera.",
                &["Planirajte dva programa u prvoj godini", "Zaposlite jednog predavača"],
                ("Saznajte više o standardnom modelu", "/franšiza/modeli/standard"),
            ),
            bucket(
                (35.0, 50.0),
                "Premium centar",
                "Kompletan obrazovni centar sa celim portfoliom programa i sopstvenim timom.",
                &["Obezbedite prostor od najmanje 100 m²", "Planirajte tim od tri predavača"],
                ("Saznajte više o premium modelu", "/franšiza/modeli/premium"),
            ),
        ],
    }
}
