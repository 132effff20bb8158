use crate::progress::ChapterKey;

/// NEET preparation syllabus, class -> subject -> ordered chapters.
/// This is the universe of valid triples; nothing at runtime mutates it.
const SYLLABUS: &[(&str, &[(&str, &[&str])])] = &[
    (
        "Class 9 (Foundation)",
        &[
            (
                "Physics",
                &[
                    "Motion",
                    "Force and Laws of Motion",
                    "Gravitation",
                    "Work and Energy",
                    "Sound",
                ],
            ),
            (
                "Chemistry",
                &[
                    "Matter in Our Surroundings",
                    "Is Matter Around Us Pure",
                    "Atoms and Molecules",
                    "Structure of the Atom",
                ],
            ),
            (
                "Biology",
                &[
                    "The Fundamental Unit of Life (Cell)",
                    "Tissues",
                    "Improvement in Food Resources",
                ],
            ),
        ],
    ),
    (
        "Class 10 (Foundation)",
        &[
            (
                "Physics",
                &[
                    "Light: Reflection and Refraction",
                    "The Human Eye",
                    "Electricity",
                    "Magnetic Effects of Electric Current",
                ],
            ),
            (
                "Chemistry",
                &[
                    "Chemical Reactions and Equations",
                    "Acids, Bases and Salts",
                    "Metals and Non-metals",
                    "Carbon and its Compounds",
                ],
            ),
            (
                "Biology",
                &[
                    "Life Processes",
                    "Control and Coordination",
                    "How do Organisms Reproduce",
                    "Heredity",
                    "Our Environment",
                ],
            ),
        ],
    ),
    (
        "Class 11 (NEET Core)",
        &[
            (
                "Physics",
                &[
                    "Units and Measurements",
                    "Motion in a Straight Line",
                    "Motion in a Plane",
                    "Laws of Motion",
                    "Work, Energy and Power",
                    "System of Particles and Rotational Motion",
                    "Gravitation",
                    "Mechanical Properties of Solids",
                    "Mechanical Properties of Fluids",
                    "Thermal Properties of Matter",
                    "Thermodynamics",
                    "Kinetic Theory",
                    "Oscillations",
                    "Waves",
                ],
            ),
            (
                "Chemistry",
                &[
                    "Some Basic Concepts of Chemistry",
                    "Structure of Atom",
                    "Classification of Elements",
                    "Chemical Bonding",
                    "Thermodynamics",
                    "Equilibrium",
                    "Redox Reactions",
                    "Organic Chemistry: Basic Principles",
                    "Hydrocarbons",
                ],
            ),
            (
                "Biology",
                &[
                    "The Living World",
                    "Biological Classification",
                    "Plant Kingdom",
                    "Animal Kingdom",
                    "Morphology of Flowering Plants",
                    "Anatomy of Flowering Plants",
                    "Structural Organisation in Animals",
                    "Cell: The Unit of Life",
                    "Biomolecules",
                    "Cell Cycle and Cell Division",
                    "Photosynthesis in Higher Plants",
                    "Respiration in Plants",
                    "Plant Growth and Development",
                    "Breathing and Exchange of Gases",
                    "Body Fluids and Circulation",
                    "Excretory Products and their Elimination",
                    "Locomotion and Movement",
                    "Neural Control and Coordination",
                    "Chemical Coordination",
                ],
            ),
        ],
    ),
    (
        "Class 12 (NEET Core)",
        &[
            (
                "Physics",
                &[
                    "Electric Charges and Fields",
                    "Electrostatic Potential and Capacitance",
                    "Current Electricity",
                    "Moving Charges and Magnetism",
                    "Magnetism and Matter",
                    "Electromagnetic Induction",
                    "Alternating Current",
                    "Electromagnetic Waves",
                    "Ray Optics",
                    "Wave Optics",
                    "Dual Nature of Radiation",
                    "Atoms",
                    "Nuclei",
                    "Semiconductor Electronics",
                ],
            ),
            (
                "Chemistry",
                &[
                    "Solutions",
                    "Electrochemistry",
                    "Chemical Kinetics",
                    "d- and f- Block Elements",
                    "Coordination Compounds",
                    "Haloalkanes and Haloarenes",
                    "Alcohols, Phenols and Ethers",
                    "Aldehydes, Ketones and Carboxylic Acids",
                    "Amines",
                    "Biomolecules",
                ],
            ),
            (
                "Biology",
                &[
                    "Sexual Reproduction in Flowering Plants",
                    "Human Reproduction",
                    "Reproductive Health",
                    "Principles of Inheritance and Variation",
                    "Molecular Basis of Inheritance",
                    "Evolution",
                    "Human Health and Disease",
                    "Microbes in Human Welfare",
                    "Biotechnology: Principles and Processes",
                    "Biotechnology and its Applications",
                    "Organisms and Populations",
                    "Ecosystem",
                    "Biodiversity and Conservation",
                ],
            ),
        ],
    ),
];

#[derive(Debug, Clone)]
struct SubjectEntry {
    name: String,
    chapters: Vec<String>,
}

#[derive(Debug, Clone)]
struct ClassEntry {
    name: String,
    subjects: Vec<SubjectEntry>,
}

/// Immutable syllabus catalog. Constructed once and injected wherever the
/// universe of valid (class, subject, chapter) triples is needed.
#[derive(Debug, Clone)]
pub struct Catalog {
    classes: Vec<ClassEntry>,
}

impl Catalog {
    /// The built-in NEET syllabus.
    pub fn builtin() -> Self {
        Self::from_entries(SYLLABUS)
    }

    /// Build a catalog from literal data. Tests use this to run tiny
    /// universes instead of the full syllabus.
    pub fn from_entries(entries: &[(&str, &[(&str, &[&str])])]) -> Self {
        let classes = entries
            .iter()
            .map(|(class, subjects)| ClassEntry {
                name: (*class).to_string(),
                subjects: subjects
                    .iter()
                    .map(|(subject, chapters)| SubjectEntry {
                        name: (*subject).to_string(),
                        chapters: chapters.iter().map(|c| (*c).to_string()).collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { classes }
    }

    pub fn classes(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn subjects(&self, class: &str) -> anyhow::Result<Vec<&str>> {
        let entry = self
            .class_entry(class)
            .ok_or_else(|| anyhow::anyhow!("unknown class: {class}"))?;
        Ok(entry.subjects.iter().map(|s| s.name.as_str()).collect())
    }

    pub fn chapters(&self, class: &str, subject: &str) -> anyhow::Result<Vec<&str>> {
        let entry = self
            .subject_entry(class, subject)
            .ok_or_else(|| anyhow::anyhow!("unknown class/subject: {class} / {subject}"))?;
        Ok(entry.chapters.iter().map(|c| c.as_str()).collect())
    }

    /// All valid triples, in catalog order.
    pub fn flatten(&self) -> Vec<ChapterKey> {
        let mut keys = Vec::with_capacity(self.chapter_count());
        for class in &self.classes {
            for subject in &class.subjects {
                for chapter in &subject.chapters {
                    keys.push(ChapterKey::new(&class.name, &subject.name, chapter));
                }
            }
        }
        keys
    }

    pub fn contains(&self, key: &ChapterKey) -> bool {
        self.subject_entry(&key.class, &key.subject)
            .map(|s| s.chapters.iter().any(|c| *c == key.chapter))
            .unwrap_or(false)
    }

    pub fn chapter_count(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|c| c.subjects.iter())
            .map(|s| s.chapters.len())
            .sum()
    }

    fn class_entry(&self, class: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|c| c.name == class)
    }

    fn subject_entry(&self, class: &str, subject: &str) -> Option<&SubjectEntry> {
        self.class_entry(class)
            .and_then(|c| c.subjects.iter().find(|s| s.name == subject))
    }
}
