//! User-facing texts and keyboards.
//!
//! Every reply the dialog can produce is built here so the transition logic
//! stays free of wording.

use crate::channels::{OutgoingResponse, ReplyMarkup};
use crate::error::FailurePoint;
use crate::profile::{ActivityLevel, Biometrics, Gender, Goal, Plan, Profile};

use super::menu::{ExercisesChoice, MenuAction};

fn keyboard(rows: Vec<Vec<&'static str>>) -> ReplyMarkup {
    ReplyMarkup::keyboard(rows)
}

/// One label per row.
fn column(labels: impl IntoIterator<Item = &'static str>) -> ReplyMarkup {
    keyboard(labels.into_iter().map(|l| vec![l]).collect())
}

fn gender_keyboard() -> ReplyMarkup {
    keyboard(vec![Gender::ALL.iter().map(Gender::label).collect()])
}

fn goal_keyboard() -> ReplyMarkup {
    column(Goal::ALL.iter().map(Goal::label))
}

fn activity_keyboard() -> ReplyMarkup {
    column(ActivityLevel::ALL.iter().map(ActivityLevel::label))
}

// ── Intake ──────────────────────────────────────────────────────────

pub fn gender_prompt() -> OutgoingResponse {
    OutgoingResponse::text("Привет! Я твой фитнес-помощник. Для начала скажи, какой у тебя пол?")
        .with_keyboard(gender_keyboard())
}

pub fn gender_retry() -> OutgoingResponse {
    OutgoingResponse::text("Пожалуйста, выбери пол из предложенных вариантов:")
        .with_keyboard(gender_keyboard())
}

pub fn age_prompt() -> OutgoingResponse {
    OutgoingResponse::text("Отлично! Теперь введи свой возраст (целое число):").remove_keyboard()
}

pub fn age_retry() -> OutgoingResponse {
    OutgoingResponse::text("Пожалуйста, введите корректный возраст (от 1 до 120):")
}

pub fn weight_prompt() -> OutgoingResponse {
    OutgoingResponse::text("Хорошо. Теперь введи свой вес в кг (например, 70.5):")
}

pub fn weight_retry() -> OutgoingResponse {
    OutgoingResponse::text("Пожалуйста, введите корректный вес (например, 70.5):")
}

pub fn height_prompt() -> OutgoingResponse {
    OutgoingResponse::text("Отлично! Теперь введи свой рост в см (например, 180):")
}

pub fn height_retry() -> OutgoingResponse {
    OutgoingResponse::text("Пожалуйста, введите корректный рост (например, 180):")
}

pub fn goal_prompt() -> OutgoingResponse {
    OutgoingResponse::text("Какова твоя цель?").with_keyboard(goal_keyboard())
}

pub fn goal_retry() -> OutgoingResponse {
    OutgoingResponse::text("Пожалуйста, выбери цель из предложенных вариантов:")
        .with_keyboard(goal_keyboard())
}

pub fn activity_prompt() -> OutgoingResponse {
    OutgoingResponse::text(
        "Какой у тебя уровень активности?\n\n\
         • Сидячий: офисная работа, нет спорта\n\
         • Легкая: 1-2 тренировки в неделю\n\
         • Умеренная: 3-4 тренировки в неделю\n\
         • Высокая: 5-6 тренировок в неделю\n\
         • Очень высокая: профессиональный спорт",
    )
    .with_keyboard(activity_keyboard())
}

pub fn activity_retry() -> OutgoingResponse {
    OutgoingResponse::text("Пожалуйста, выбери уровень активности из предложенных вариантов:")
        .with_keyboard(activity_keyboard())
}

// ── Menus ───────────────────────────────────────────────────────────

pub fn main_menu() -> OutgoingResponse {
    OutgoingResponse::text("Главное меню. Выберите действие:")
        .with_keyboard(keyboard(MenuAction::rows()))
}

pub fn menu_retry() -> OutgoingResponse {
    OutgoingResponse::text("Пожалуйста, используйте кнопки меню:")
}

pub fn menu_closed() -> OutgoingResponse {
    OutgoingResponse::text("Главное меню закрыто. Напишите /start для перезахода.")
        .remove_keyboard()
}

pub fn exercises_menu() -> OutgoingResponse {
    OutgoingResponse::text("Выберите цель для просмотра упражнений:")
        .with_keyboard(keyboard(ExercisesChoice::rows()))
}

pub fn exercises(goal: Goal) -> OutgoingResponse {
    let text = match goal {
        Goal::WeightLoss => WEIGHT_LOSS_EXERCISES,
        Goal::WeightGain => MASS_GAIN_EXERCISES,
        Goal::Maintenance => MAINTENANCE_EXERCISES,
    };
    OutgoingResponse::text(text)
}

// ── Commands and notices ────────────────────────────────────────────

pub fn dialog_cancelled() -> OutgoingResponse {
    OutgoingResponse::text("Диалог прерван.")
}

pub fn unknown_command() -> OutgoingResponse {
    OutgoingResponse::text("Неизвестная команда.")
}

pub fn restart_notice() -> OutgoingResponse {
    OutgoingResponse::text("Напишите /start чтобы начать заново.")
}

pub fn profile_not_found() -> OutgoingResponse {
    OutgoingResponse::text("Профиль не найден. Создайте новый план с помощью /start")
}

pub fn profile_required() -> OutgoingResponse {
    OutgoingResponse::text("Сначала создайте профиль через /start")
}

pub fn weight_update_prompt(current: f64) -> OutgoingResponse {
    OutgoingResponse::text(format!("Текущий вес: {current} кг\nВведите новый вес:"))
        .remove_keyboard()
}

pub fn weight_updated(weight: f64) -> OutgoingResponse {
    OutgoingResponse::text(format!(
        "✅ Вес обновлен на {weight} кг\nНовые рекомендации рассчитаны!"
    ))
}

/// Apology for a storage failure at `point`.
pub fn apology(point: FailurePoint) -> OutgoingResponse {
    let text = match point {
        FailurePoint::Registration => "Ошибка базы данных. Попробуйте позже.",
        FailurePoint::ProfileLookup => "Ошибка при загрузке профиля. Попробуйте позже.",
        FailurePoint::PlanSave => {
            "Произошла ошибка при расчете плана. Попробуйте позже или напишите /start для перезапуска."
        }
    };
    OutgoingResponse::text(text)
}

/// Reply for a turn that was aborted or crashed.
pub fn turn_failed() -> OutgoingResponse {
    OutgoingResponse::text("Что-то пошло не так. Попробуйте еще раз или напишите /start.")
}

// ── Summaries ───────────────────────────────────────────────────────

fn biometrics_lines(b: &Biometrics) -> String {
    format!(
        "• Пол: {}\n\
         • Возраст: {} лет\n\
         • Вес: {} кг\n\
         • Рост: {} см\n\
         • Цель: {}\n\
         • Активность: {}",
        b.gender.label(),
        b.age,
        b.weight,
        b.height,
        b.goal.label(),
        b.activity_level.short_label(),
    )
}

fn nutrition_lines(plan: &Plan) -> String {
    format!(
        "• Калории: {} ккал/день\n\
         • Белки: {} г/день\n\
         • Жиры: {} г/день\n\
         • Углеводы: {} г/день",
        plan.daily_calories, plan.protein_goal, plan.fat_goal, plan.carbs_goal,
    )
}

/// Full plan sent when intake completes.
pub fn plan_summary(b: &Biometrics, plan: &Plan) -> OutgoingResponse {
    OutgoingResponse::text(format!(
        "🎯 **Ваш персональный фитнес-план:**\n\n\
         📊 **Данные:**\n{}\n\n\
         🍽 **Питание:**\n{}\n\n\
         {}\n\n\
         {}\n\n\
         📝 **Рекомендации:**\n\
         • Взвешивайтесь 1 раз в неделю утром натощак\n\
         • Пейте достаточное количество воды (30-40 мл на кг веса)\n\
         • Спите 7-8 часов в сутки\n\
         • Делайте прогрессию нагрузок\n\
         • Ведите дневник питания и тренировок\n\n\
         💡 **Совет:** Начинайте постепенно, не пытайтесь сразу выполнить всю программу.\n\n\
         Для нового расчета напишите /start",
        biometrics_lines(b),
        nutrition_lines(plan),
        plan.workout_plan,
        plan.diet_advice,
    ))
}

/// Latest saved profile.
pub fn profile_card(profile: &Profile) -> OutgoingResponse {
    OutgoingResponse::text(format!(
        "📊 ВАШ ПРОФИЛЬ:\n\n{}\n\n🍽 ПИТАНИЕ:\n{}\n\n\
         Используйте /update_weight чтобы обновить вес",
        biometrics_lines(&profile.biometrics),
        nutrition_lines(&profile.plan),
    ))
}

// ── Exercise catalogues ─────────────────────────────────────────────

const WEIGHT_LOSS_EXERCISES: &str = "\
🔥 УПРАЖНЕНИЯ ДЛЯ ПОХУДЕНИЯ 🔥

🏋️‍♂️ БАЗОВЫЕ УПРАЖНЕНИЯ:
• Приседания со штангой - 3×12-15
• Жим лежа - 3×12-15
• Становая тяга - 3×12-15
• Тяга верхнего блока - 3×12-15
• Жим ногами - 3×15-20

⚡ КАРДИО УПРАЖНЕНИЯ:
• Бег интервальный - 25-30 мин
• Велотренажер - 30-40 мин
• Эллипс - 30 мин
• Скакалка - 10-15 мин

💥 HIIT УПРАЖНЕНИЯ:
• Берпи - 45 сек работа/15 отдых
• Альпинист - 45 сек/15 отдых
• Прыжки с приседом - 40 сек/20 отдых

📋 ФОРМАТ ТРЕНИРОВКИ:
• Разминка: 10-15 мин
• Силовая часть: 45-50 мин
• Кардио: 25-30 мин
• Заминка: 10-15 мин

💡 СОВЕТ: Делайте 3-4 тренировки в неделю, сочетая силовые и кардио, и не забывайте про дефицит калорий";

const MASS_GAIN_EXERCISES: &str = "\
💪 УПРАЖНЕНИЯ ДЛЯ НАБОРА МАССЫ 💪

🏋️‍♂️ БАЗА (ОСНОВА РОСТА):
• Понедельник Спина/Бицепс
    1. Подтягивания на перекладине - 4х6-8
    2. Румынская тяга - 4х6-8
    3. Тяга штанги к поясу - 4х6-8
    4. Подъём зет-штанги - 4х10-12
• Среда Грудь/Трицепс
    1. Жим лёжа 4х6-8
    2. Жим гантелей на наклонной скамье - 4х6-8
    3. Сведения в кроссовере - 4х12-20
    4. Французский жим - 4х10-12
• Пятница Ноги/Плечи
    1. Приседания со штангой - 4х6-8
    2. Жим ногами - 4х8-12
    3. Жим на икры - 4х12-20
    4. Махи руками с гантелями - 4х10-12

📈 ВСПОМОГАТЕЛЬНЫЕ:
• Разводка гантелей - 3×15
• Вертикальная тяга - 3x12
• Жим к низу в блочном тренажёре - 3x12
• Разгибания ног - 3×12-15
• Сгибания ног - 3×12-15
• Подъемы на носки - 4×15-20

📋 ФОРМАТ ТРЕНИРОВКИ:
• Разминка: 10-15 мин
• Основные упражнения: 60-70 мин
• Вспомогательные: 20-30 мин
• Растяжка: 10 мин

💡 СОВЕТ: Соблюдайте прогрессию весов в упражнениях (1-ый подход 50% от максимального, 4-ый подход 80-85% от максимального веса)!";

const MAINTENANCE_EXERCISES: &str = "\
⚖️ УПРАЖНЕНИЯ ДЛЯ ПОДДЕРЖАНИЯ ФОРМЫ ⚖️

🏋️‍♂️ КРУГОВАЯ ТРЕНИРОВКА:
• Приседания - 3×12-15
• Отжимания - 3×12-15
• Тяга гантели - 3×12 на сторону
• Планка - 3×60 сек
• Выпады - 3×12 на ногу

🎯 ФУНКЦИОНАЛЬНЫЕ:
• Берпи - 3×10
• Прыжки на скакалке - 3×100
• Боковая планка - 3×45 сек
• Подъемы корпуса - 3×20
• Ягодичный мостик - 3×15

🏃‍♂️ КАРДИО МИКС:
• Бег трусцой - 20-30 мин
• Велосипед - 25-35 мин
• Плавание - 30-40 мин
• Скандинавская ходьба - 40-50 мин

📋 ФОРМАТ ТРЕНИРОВКИ:
• Разминка: 10 мин
• Основной блок: 45-50 мин
• Кардио: 20-25 мин
• Растяжка: 10-15 мин

💡 СОВЕТ: 3 тренировки в неделю + активный отдых";
