//! Plan computation: calorie target, macros and goal-specific advice.

use super::model::{Biometrics, Gender, Goal, Plan};

/// Mifflin–St Jeor basal metabolic rate in kcal/day.
pub fn basal_metabolic_rate(b: &Biometrics) -> f64 {
    let base = 10.0 * b.weight + 6.25 * f64::from(b.height) - 5.0 * f64::from(b.age);
    match b.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Daily calories before truncation: BMR scaled by activity, offset by goal.
pub fn target_calories(b: &Biometrics) -> f64 {
    basal_metabolic_rate(b) * b.activity_level.multiplier() + b.goal.calorie_adjustment()
}

/// Derive the full plan. Integer targets truncate toward zero; carbs fill the
/// calories left after the already-truncated protein and fat.
pub fn compute_plan(b: &Biometrics) -> Plan {
    let calories = target_calories(b);

    let protein = (b.weight * 2.2) as i32;
    let fat = (b.weight * 1.0) as i32;
    let carbs = ((calories - f64::from(protein * 4 + fat * 9)) / 4.0) as i32;

    Plan {
        daily_calories: calories as i32,
        protein_goal: protein,
        fat_goal: fat,
        carbs_goal: carbs,
        workout_plan: workout_plan(b.goal).to_string(),
        diet_advice: diet_advice(b.goal).to_string(),
    }
}

pub fn workout_plan(goal: Goal) -> &'static str {
    match goal {
        Goal::WeightLoss => {
            "🏃‍♂️ **Тренировки для похудения:**\n\
             • 3-4 раза в неделю: кардио 30-45 минут\n\
             • Силовые тренировки всего тела: 3 подхода по 12-15 повторений\n\
             • Упражнения: приседания, выпады, отжимания, планка, берпи\n\
             • Интервальные тренировки (HIIT) 2 раза в неделю\n\
             • Общее время тренировки: 45-60 минут"
        }
        Goal::WeightGain => {
            "💪 **Тренировки для набора массы:**\n\
             • 3 раза в неделю: сплит тренировки\n\
             • Пн: Грудь/Трицепс\n\
             • Ср: Спина/Бицепс\n\
             • Пт: Ноги/Плечи\n\
             • Силовые упражнения: 4 подхода по 8-12 повторений\n\
             • База: жим лежа, становая тяга, приседания\n\
             • Отдых между подходами: 60-90 секунд"
        }
        Goal::Maintenance => {
            "⚖️ **Тренировки для поддержания формы:**\n\
             • 3 раза в неделю: круговые тренировки всего тела\n\
             • Сочетание кардио и силовых упражнений\n\
             • 3 подхода по 10-12 повторений\n\
             • Упражнения: приседания, отжимания, подтягивания, планка\n\
             • Продолжительность: 40-50 минут за тренировку"
        }
    }
}

pub fn diet_advice(goal: Goal) -> &'static str {
    match goal {
        Goal::WeightLoss => {
            "🥗 **Питание для похудения:**\n\
             • Дефицит калорий: потребляйте на 500 ккал меньше нормы\n\
             • Белки: 2-2.5г на кг веса (курица, рыба, тофу, творог)\n\
             • Овощи: не менее 400г в день\n\
             • Исключите: сахар, processed food, сладкие напитки\n\
             • Пейте 2-3 литра воды в день\n\
             • Пример приема пищи: куриная грудка 150г + гречка 100г + овощной салат\n\
             • Последний прием пищи: за 3-4 часа до сна"
        }
        Goal::WeightGain => {
            "🍗 **Питание для набора массы:**\n\
             • Профицит калорий: потребляйте на 500 ккал больше нормы\n\
             • Белки: 2-2.5г на кг веса (говядина, курица, яйца, рыба)\n\
             • Углеводы: сложные (гречка, рис, овсянка, макароны из твердых сортов)\n\
             • 5-6 приемов пищи в день + перекусы\n\
             • Перекусы: орехи, творог, протеиновые коктейли, бананы\n\
             • Пример приема пищи: говядина 200г + рис 150г + овощи + авокадо"
        }
        Goal::Maintenance => {
            "🥦 **Сбалансированное питание:**\n\
             • Поддерживайте баланс БЖУ согласно расчетам\n\
             • Белки: 1.5-2г на кг веса (курица, рыба, бобовые)\n\
             • Жиры: 1г на кг веса (орехи, авокадо, оливковое масло, рыбий жир)\n\
             • Углеводы: сложные (крупы, цельнозерновой хлеб, овощи)\n\
             • Ешьте разнообразную пищу, 4-5 приемов в день\n\
             • Не забывайте про фрукты и овощи (5 порций в день)"
        }
    }
}
