// ============================================================
// Layer 3 — Patient Domain Types
// ============================================================
// A patient record is the eight clinical measurements the model
// consumes. The order of FEATURE_COLUMNS is the one and only
// feature order in the system: the training loader, the HTTP
// handler and the batch validator all build their feature vectors
// through this module.
//
//   index  column                    JSON key
//   0      Pregnancies               pregnancies
//   1      Glucose                   glucose
//   2      BloodPressure             blood_pressure
//   3      SkinThickness             skin_thickness
//   4      Insulin                   insulin
//   5      BMI                       bmi
//   6      DiabetesPedigreeFunction  diabetes_pedigree_function
//   7      Age                       age

/// Number of numeric features per patient
pub const N_FEATURES: usize = 8;

/// CSV column names in feature order (case-sensitive)
pub const FEATURE_COLUMNS: [&str; N_FEATURES] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// Label column of the training CSV, stored after the features
pub const OUTCOME_COLUMN: &str = "Outcome";

/// Fixed-order numeric encoding of one patient
pub type FeatureVector = [f64; N_FEATURES];

/// One patient's measurements, individually typed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatientRecord {
    pub pregnancies:                u32,
    pub glucose:                    f64,
    pub blood_pressure:             f64,
    pub skin_thickness:             f64,
    pub insulin:                    f64,
    pub bmi:                        f64,
    pub diabetes_pedigree_function: f64,
    pub age:                        u32,
}

impl PatientRecord {
    /// Encode the record in FEATURE_COLUMNS order.
    pub fn to_features(&self) -> FeatureVector {
        [
            f64::from(self.pregnancies),
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            f64::from(self.age),
        ]
    }
}

/// Binary diagnosis label. Class index 0 is negative, 1 is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Negative,
    Positive,
}

impl Outcome {
    pub const N_CLASSES: usize = 2;

    /// Parse the numeric label used by the dataset (0 or 1).
    pub fn from_value(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Outcome::Negative)
        } else if value == 1.0 {
            Some(Outcome::Positive)
        } else {
            None
        }
    }

    /// Map a classifier class index back to a label.
    /// Any index other than 1 is treated as negative.
    pub fn from_class(class: usize) -> Self {
        if class == 1 { Outcome::Positive } else { Outcome::Negative }
    }

    pub fn class_index(self) -> usize {
        match self {
            Outcome::Negative => 0,
            Outcome::Positive => 1,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Outcome::Positive
    }
}
