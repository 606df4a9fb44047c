// ABOUTME: Server-side data models for users, workouts, meals and goals
// ABOUTME: Defines persisted records and their enumerations with string conversions for storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Common data models
//!
//! `User` is the only model that carries secrets; it converts into the
//! public [`Identity`] before leaving the server.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use fittrack_core::models::{AuthPayload, FitnessLevel, Identity, IdentityPatch};

/// Implements `as_str`, `Display` and `FromStr` for a unit-only enum stored as text
macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Storage representation
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(concat!("Unknown ", stringify!($name), ": {}"), other)),
                }
            }
        }
    };
}

/// Registered user account
#[derive(Debug, Clone)]
pub struct User {
    /// Unique ID, also the JWT subject
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Unique login email (stored lowercase)
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Age in years
    pub age: Option<u32>,
    /// Height in centimetres
    pub height_cm: Option<f64>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Self-reported training level
    pub fitness_level: Option<FitnessLevel>,
    /// Administrator capability
    pub is_admin: bool,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Last profile change
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a non-admin user with an empty profile
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            age: None,
            height_cm: None,
            weight_kg: None,
            fitness_level: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Public view of this user
    #[must_use]
    pub fn to_identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            fitness_level: self.fitness_level,
            is_admin: self.is_admin,
        }
    }
}

/// Kind of training session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    /// Running, cycling, rowing
    Cardio,
    /// Resistance training
    Strength,
    /// Stretching and mobility
    Flexibility,
    /// High-intensity interval training
    Hiit,
    /// Anything else
    Other,
}

string_enum!(WorkoutType {
    Cardio => "cardio",
    Strength => "strength",
    Flexibility => "flexibility",
    Hiit => "hiit",
    Other => "other",
});

/// One exercise inside a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Exercise name
    pub name: String,
    /// Number of sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    /// Repetitions per set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Load in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Duration for timed exercises
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// Logged training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique ID
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Session name
    pub name: String,
    /// Session kind
    pub workout_type: WorkoutType,
    /// Total duration
    pub duration_minutes: u32,
    /// Estimated energy expenditure
    pub calories_burned: Option<u32>,
    /// Exercises performed
    pub exercises: Vec<Exercise>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Day the session took place
    pub date: NaiveDate,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

/// Meal slot in the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Between meals
    Snack,
}

string_enum!(MealType {
    Breakfast => "breakfast",
    Lunch => "lunch",
    Dinner => "dinner",
    Snack => "snack",
});

/// Nutrition log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Unique ID
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Meal description
    pub name: String,
    /// Slot in the day
    pub meal_type: MealType,
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrates in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
    /// Day eaten
    pub date: NaiveDate,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

/// Daily nutrition totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    /// Day summarised
    pub date: Option<NaiveDate>,
    /// Number of meals logged
    pub meal_count: u32,
    /// Total kcal
    pub total_calories: u64,
    /// Total protein
    pub total_protein_g: f64,
    /// Total carbohydrates
    pub total_carbs_g: f64,
    /// Total fat
    pub total_fat_g: f64,
}

impl NutritionSummary {
    /// Sum the given meals
    #[must_use]
    pub fn from_meals(date: Option<NaiveDate>, meals: &[Meal]) -> Self {
        meals.iter().fold(
            Self {
                date,
                ..Self::default()
            },
            |mut acc, meal| {
                acc.meal_count += 1;
                acc.total_calories += u64::from(meal.calories);
                acc.total_protein_g += meal.protein_g;
                acc.total_carbs_g += meal.carbs_g;
                acc.total_fat_g += meal.fat_g;
                acc
            },
        )
    }
}

/// What a goal is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Lose body weight
    WeightLoss,
    /// Gain muscle mass
    MuscleGain,
    /// Improve endurance
    Endurance,
    /// Improve strength
    Strength,
    /// Improve mobility
    Flexibility,
    /// Anything else
    General,
}

string_enum!(GoalType {
    WeightLoss => "weight_loss",
    MuscleGain => "muscle_gain",
    Endurance => "endurance",
    Strength => "strength",
    Flexibility => "flexibility",
    General => "general",
});

/// Goal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// In progress
    #[default]
    Active,
    /// Target reached
    Completed,
    /// Given up
    Abandoned,
}

string_enum!(GoalStatus {
    Active => "active",
    Completed => "completed",
    Abandoned => "abandoned",
});

/// Personal fitness goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique ID
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Short title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Goal category
    pub goal_type: GoalType,
    /// Value that completes the goal
    pub target_value: f64,
    /// Latest recorded value
    pub current_value: f64,
    /// Unit of both values (kg, km, minutes, ...)
    pub unit: String,
    /// Optional deadline
    pub deadline: Option<NaiveDate>,
    /// Lifecycle state
    pub status: GoalStatus,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Progress towards the target in percent, clamped to `[0, 100]`
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.target_value <= 0.0 {
            return 0.0;
        }
        (self.current_value / self.target_value * 100.0).clamp(0.0, 100.0)
    }

    /// Record a new value, completing an active goal whose target is reached
    pub fn record_progress(&mut self, value: f64) {
        self.current_value = value;
        if self.status == GoalStatus::Active && self.target_value > 0.0 && value >= self.target_value
        {
            self.status = GoalStatus::Completed;
        }
        self.updated_at = Utc::now();
    }
}
