// ABOUTME: Templated workout and nutrition plan constructors
// ABOUTME: Builds weekly training splits by goal and level and calorie/macro targets from body metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Contributors

//! Plan generation
//!
//! Plans are pure functions of their inputs. Workout plans pick a weekly split
//! from a fixed template table and scale the volume by fitness level.
//! Nutrition plans estimate energy needs with the Mifflin-St Jeor equation
//! using the midpoint of its sex-specific constants.

use serde::{Deserialize, Serialize};

use crate::models::{Exercise, FitnessLevel, GoalType, MealType, WorkoutType};

/// Fewest training days a plan will contain
pub const MIN_DAYS_PER_WEEK: u8 = 1;
/// Most training days a plan will contain
pub const MAX_DAYS_PER_WEEK: u8 = 7;
/// Calorie floor for any nutrition plan
pub const MIN_DAILY_CALORIES: u32 = 1200;

// Midpoint of Mifflin-St Jeor's +5 (male) and -161 (female)
const MIFFLIN_SEX_CONSTANT: f64 = -78.0;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;
const FAT_SHARE: f64 = 0.25;

/// One session in a generated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSession {
    /// Day of the week, 1-based
    pub day: u8,
    /// Session name
    pub name: String,
    /// Session kind
    pub workout_type: WorkoutType,
    /// Planned duration
    pub duration_minutes: u32,
    /// Exercises with level-scaled volume
    pub exercises: Vec<Exercise>,
}

/// Weekly training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    /// Level the volume was scaled for
    pub fitness_level: FitnessLevel,
    /// Goal the split was chosen for
    pub goal: GoalType,
    /// Number of sessions
    pub days_per_week: u8,
    /// Sessions in weekly order
    pub sessions: Vec<PlannedSession>,
}

struct SessionTemplate {
    name: &'static str,
    workout_type: WorkoutType,
    exercises: &'static [&'static str],
}

const FULL_BODY: SessionTemplate = SessionTemplate {
    name: "Full Body Strength",
    workout_type: WorkoutType::Strength,
    exercises: &["Squat", "Bench Press", "Bent-Over Row", "Plank"],
};
const UPPER_BODY: SessionTemplate = SessionTemplate {
    name: "Upper Body",
    workout_type: WorkoutType::Strength,
    exercises: &["Overhead Press", "Pull-Up", "Dumbbell Bench Press", "Bicep Curl"],
};
const LOWER_BODY: SessionTemplate = SessionTemplate {
    name: "Lower Body",
    workout_type: WorkoutType::Strength,
    exercises: &["Deadlift", "Lunge", "Leg Press", "Calf Raise"],
};
const STEADY_CARDIO: SessionTemplate = SessionTemplate {
    name: "Steady-State Cardio",
    workout_type: WorkoutType::Cardio,
    exercises: &["Easy Run"],
};
const INTERVALS: SessionTemplate = SessionTemplate {
    name: "Interval Training",
    workout_type: WorkoutType::Hiit,
    exercises: &["Burpee", "Mountain Climber", "Jump Squat", "High Knees"],
};
const MOBILITY: SessionTemplate = SessionTemplate {
    name: "Mobility Flow",
    workout_type: WorkoutType::Flexibility,
    exercises: &["Hip Flexor Stretch", "Cat-Cow", "Hamstring Stretch", "Thoracic Rotation"],
};

fn rotation(goal: GoalType) -> &'static [SessionTemplate] {
    match goal {
        GoalType::MuscleGain | GoalType::Strength => &[UPPER_BODY, LOWER_BODY, FULL_BODY],
        GoalType::WeightLoss => &[INTERVALS, FULL_BODY, STEADY_CARDIO],
        GoalType::Endurance => &[STEADY_CARDIO, INTERVALS, STEADY_CARDIO, FULL_BODY],
        GoalType::Flexibility => &[MOBILITY, FULL_BODY, MOBILITY],
        GoalType::General => &[FULL_BODY, STEADY_CARDIO, MOBILITY],
    }
}

/// `(sets, reps, cardio minutes)` for a level
const fn volume(level: FitnessLevel) -> (u32, u32, u32) {
    match level {
        FitnessLevel::Beginner => (2, 10, 20),
        FitnessLevel::Intermediate => (3, 10, 30),
        FitnessLevel::Advanced => (4, 8, 45),
    }
}

/// Build a weekly plan; `days_per_week` is clamped to `1..=7`
#[must_use]
pub fn workout_plan(
    fitness_level: FitnessLevel,
    goal: GoalType,
    days_per_week: u8,
    session_minutes: u32,
) -> WorkoutPlan {
    let days = days_per_week.clamp(MIN_DAYS_PER_WEEK, MAX_DAYS_PER_WEEK);
    let templates = rotation(goal);
    let (sets, reps, cardio_minutes) = volume(fitness_level);

    let sessions = (0..days)
        .zip(templates.iter().cycle())
        .map(|(index, template)| {
            let exercises = template
                .exercises
                .iter()
                .map(|name| match template.workout_type {
                    WorkoutType::Cardio => Exercise {
                        name: (*name).to_owned(),
                        sets: None,
                        reps: None,
                        weight_kg: None,
                        duration_minutes: Some(cardio_minutes.min(session_minutes)),
                    },
                    _ => Exercise {
                        name: (*name).to_owned(),
                        sets: Some(sets),
                        reps: Some(reps),
                        weight_kg: None,
                        duration_minutes: None,
                    },
                })
                .collect();

            PlannedSession {
                day: index + 1,
                name: template.name.to_owned(),
                workout_type: template.workout_type,
                duration_minutes: session_minutes,
                exercises,
            }
        })
        .collect();

    WorkoutPlan {
        fitness_level,
        goal,
        days_per_week: days,
        sessions,
    }
}

/// Daily activity multiplier applied to the basal rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Desk job, little exercise
    Sedentary,
    /// Exercise 1-3 days a week
    Light,
    /// Exercise 3-5 days a week
    #[default]
    Moderate,
    /// Exercise 6-7 days a week
    Active,
    /// Physical job plus daily training
    VeryActive,
}

impl ActivityLevel {
    /// Total-energy multiplier
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }
}

/// Direction of the calorie target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionGoal {
    /// Calorie deficit
    Lose,
    /// Energy balance
    #[default]
    Maintain,
    /// Calorie surplus
    Gain,
}

impl NutritionGoal {
    const fn calorie_adjustment(self) -> f64 {
        match self {
            Self::Lose => -500.0,
            Self::Maintain => 0.0,
            Self::Gain => 300.0,
        }
    }

    const fn protein_per_kg(self) -> f64 {
        match self {
            Self::Lose | Self::Gain => 2.0,
            Self::Maintain => 1.6,
        }
    }
}

/// Inputs to the energy estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMetrics {
    /// Age in years
    pub age: u32,
    /// Height in centimetres
    pub height_cm: f64,
    /// Body weight in kilograms
    pub weight_kg: f64,
}

/// Calorie share of one meal slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    /// Slot
    pub meal_type: MealType,
    /// Calories for the slot
    pub calories: u32,
}

/// Daily calorie and macro targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlan {
    /// Basal metabolic rate
    pub bmr: u32,
    /// Total daily energy expenditure
    pub tdee: u32,
    /// Goal-adjusted intake target
    pub daily_calories: u32,
    /// Protein target
    pub protein_g: u32,
    /// Carbohydrate target
    pub carbs_g: u32,
    /// Fat target
    pub fat_g: u32,
    /// Per-slot split of `daily_calories`
    pub meals: Vec<PlannedMeal>,
    /// Goal the plan targets
    pub goal: NutritionGoal,
}

const MEAL_SPLIT: [(MealType, f64); 4] = [
    (MealType::Breakfast, 0.25),
    (MealType::Lunch, 0.35),
    (MealType::Dinner, 0.30),
    (MealType::Snack, 0.10),
];

/// Mifflin-St Jeor basal metabolic rate
#[must_use]
pub fn basal_metabolic_rate(metrics: &BodyMetrics) -> f64 {
    10.0f64.mul_add(
        metrics.weight_kg,
        6.25f64.mul_add(metrics.height_cm, -5.0 * f64::from(metrics.age)),
    ) + MIFFLIN_SEX_CONSTANT
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn kcal(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

/// Build daily targets from body metrics
#[must_use]
pub fn nutrition_plan(
    metrics: &BodyMetrics,
    activity: ActivityLevel,
    goal: NutritionGoal,
) -> NutritionPlan {
    let bmr = basal_metabolic_rate(metrics);
    let tdee = bmr * activity.multiplier();
    let daily = (tdee + goal.calorie_adjustment()).max(f64::from(MIN_DAILY_CALORIES));

    let protein_g = goal.protein_per_kg() * metrics.weight_kg;
    let fat_g = daily * FAT_SHARE / KCAL_PER_G_FAT;
    let carbs_g = (protein_g.mul_add(-KCAL_PER_G_PROTEIN, daily) - fat_g * KCAL_PER_G_FAT)
        / KCAL_PER_G_CARBS;

    let daily_calories = kcal(daily);
    let meals = MEAL_SPLIT
        .iter()
        .map(|(meal_type, share)| PlannedMeal {
            meal_type: *meal_type,
            calories: kcal(f64::from(daily_calories) * share),
        })
        .collect();

    NutritionPlan {
        bmr: kcal(bmr),
        tdee: kcal(tdee),
        daily_calories,
        protein_g: kcal(protein_g),
        carbs_g: kcal(carbs_g),
        fat_g: kcal(fat_g),
        meals,
        goal,
    }
}
