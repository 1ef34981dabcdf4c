//! Outgoing question and message texts
//!
//! Pure data: one text per interview step plus the fixed messages of the
//! feedback and closing branches. Two built-in bundles exist (`english`,
//! `russian`); deployments override individual texts through the JSON
//! config file.

use crate::state_machine::state::{QuestionKey, Step};
use serde::{Deserialize, Serialize};

/// Placeholder substituted by [`PromptTable::retry`]
const TOPIC_PLACEHOLDER: &str = "{topic}";

/// Per-field display names (one per interview question)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    pub trip_type: String,
    pub destination: String,
    pub group_size: String,
    pub travel_dates: String,
    pub departure_city: String,
}

impl FieldNames {
    /// Name for an interview question, `None` for feedback keys
    pub fn get(&self, key: QuestionKey) -> Option<&str> {
        match key {
            QuestionKey::TripType => Some(&self.trip_type),
            QuestionKey::Destination => Some(&self.destination),
            QuestionKey::GroupSize => Some(&self.group_size),
            QuestionKey::TravelDates => Some(&self.travel_dates),
            QuestionKey::DepartureCity => Some(&self.departure_city),
            QuestionKey::Feedback | QuestionKey::HumanAgentRequest => None,
        }
    }
}

/// Texts used by the summary builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryText {
    pub header: String,
    pub footer: String,
    /// Rendered in place of an answer that was never given
    pub not_specified: String,
    pub labels: FieldNames,
    pub recommendation_heading: String,
    /// Inline notice when no recommendation could be obtained; `{reason}` is substituted
    pub recommendation_failure: String,
}

/// Prompt table for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTable {
    pub greeting: String,
    pub restart_notice: String,
    pub trip_type: String,
    pub destination: String,
    pub group_size: String,
    pub travel_dates: String,
    pub departure_city: String,
    pub feedback_request: String,
    pub negative_feedback: String,
    pub neutral_feedback: String,
    pub human_agent_offer: String,
    pub closing_handoff: String,
    pub closing_thanks: String,
    /// Re-ask after an invalid answer; `{topic}` is substituted
    pub retry: String,
    pub retry_topics: FieldNames,
    pub max_errors_apology: String,
    pub summary: SummaryText,
}

impl PromptTable {
    /// Question asked when the session enters `step`.
    ///
    /// Steps 6 and 9 have no question: the summary is synthesized and the
    /// terminal step only carries a closing message.
    pub fn question(&self, step: Step) -> Option<&str> {
        match step {
            Step::TripType => Some(&self.trip_type),
            Step::Destination => Some(&self.destination),
            Step::GroupSize => Some(&self.group_size),
            Step::TravelDates => Some(&self.travel_dates),
            Step::DepartureCity => Some(&self.departure_city),
            Step::Feedback => Some(&self.feedback_request),
            Step::HumanAgentOffer => Some(&self.human_agent_offer),
            Step::Summary | Step::Terminal => None,
        }
    }

    /// Clarification prompt for an invalid answer to `key`
    pub fn retry(&self, key: QuestionKey) -> String {
        let topic = self.retry_topics.get(key).unwrap_or_default();
        self.retry.replace(TOPIC_PLACEHOLDER, topic)
    }

    pub fn english() -> Self {
        Self {
            greeting: "Welcome! I'm here to help you plan your trip. \
                       Tell me what you're looking for and we'll get started."
                .to_string(),
            restart_notice: "Let's plan a new trip!".to_string(),
            trip_type: "What kind of trip are you planning?\n\n\
                        Choose one of the following options:\n\
                        1) Independent trip: you organize everything yourself\n\
                        2) Organized tourism: use the services of a tour operator (recommended)\n\
                        3) Business trip\n\n\
                        Enter the number (1, 2 or 3) or the full name of the option."
                .to_string(),
            destination: "Which country, city or resort would you like to visit? \
                          Please name a specific destination."
                .to_string(),
            group_size: "How many people are going on this trip? \
                         Please give the number of travellers."
                .to_string(),
            travel_dates: "Around which dates are you planning to travel? \
                           Give specific dates or a date range."
                .to_string(),
            departure_city: "From which city, or nearest major city, will your journey start? \
                             Please name the departure city."
                .to_string(),
            feedback_request: "How do you like these recommendations? \
                               Tell us what you think."
                .to_string(),
            negative_feedback: "We're sorry the recommendations didn't suit you. \
                                Please tell us more: what exactly would you like to change?"
                .to_string(),
            neutral_feedback: "Could you please clarify what you think of the recommendations? \
                               Did they suit you?"
                .to_string(),
            human_agent_offer: "Glad you liked it! Would you like one of our travel agents \
                                to contact you to finalize the booking? (yes/no)"
                .to_string(),
            closing_handoff: "Great! A travel agent will contact you shortly. \
                              Thank you for using our travel planning service!"
                .to_string(),
            closing_thanks: "Thank you for using our travel planning service! \
                             Have a pleasant journey!"
                .to_string(),
            retry: "I'm sorry, I didn't understand your response clearly.\n\n\
                    Could you please answer the question about {topic}?\n\n\
                    If you're unsure or would rather not answer right now, \
                    let me know when would be a good time to ask again.\n\n\
                    Please provide a clear answer so we can continue with your travel planning."
                .to_string(),
            retry_topics: FieldNames {
                trip_type: "the trip type (1, 2 or 3)".to_string(),
                destination: "the destination (country, city or resort)".to_string(),
                group_size: "the number of people traveling".to_string(),
                travel_dates: "the travel dates".to_string(),
                departure_city: "the departure city".to_string(),
            },
            max_errors_apology: "I apologize, but I'm having trouble understanding your responses. \
                                 Please try again later or contact our support team for assistance. \
                                 Thank you for your time!"
                .to_string(),
            summary: SummaryText {
                header: "Dear traveller, you entered the following information:".to_string(),
                footer: "Have a pleasant journey!".to_string(),
                not_specified: "not specified".to_string(),
                labels: FieldNames {
                    trip_type: "Trip type".to_string(),
                    destination: "Destination".to_string(),
                    group_size: "Number of travellers".to_string(),
                    travel_dates: "Travel dates".to_string(),
                    departure_city: "Departure city".to_string(),
                },
                recommendation_heading: "Our recommendations:".to_string(),
                recommendation_failure: "Sorry, we could not prepare recommendations right now ({reason})."
                    .to_string(),
            },
        }
    }

    pub fn russian() -> Self {
        Self {
            greeting: "Здравствуйте! Я помогу вам спланировать поездку. \
                       Расскажите, что вы ищете, и мы начнём."
                .to_string(),
            restart_notice: "Давайте спланируем новую поездку!".to_string(),
            trip_type: "Какую поездку вы планируете?\n\n\
                        Выберите один из следующих вариантов:\n\
                        1) Самостоятельная поездка: вы всё организуете сами\n\
                        2) Организованный туризм: воспользуйтесь услугами туроператора (рекомендуется)\n\
                        3) Деловая поездка\n\n\
                        Укажите номер (1, 2 или 3) или полное название варианта."
                .to_string(),
            destination: "Какую страну, город или курорт вы хотели бы посетить? \
                          Укажите конкретное место назначения."
                .to_string(),
            group_size: "Сколько человек планирует отправиться в эту поездку? \
                         Укажите, пожалуйста, количество путешественников."
                .to_string(),
            travel_dates: "На какие приблизительные даты вы планируете поездку? \
                           Укажите конкретные даты или диапазон дат."
                .to_string(),
            departure_city: "Из какого города или ближайшего крупного города вы планируете \
                             начать путешествие? Укажите, пожалуйста, город отправления."
                .to_string(),
            feedback_request: "Как вам наши рекомендации? Поделитесь, пожалуйста, впечатлением."
                .to_string(),
            negative_feedback: "Жаль, что рекомендации вам не подошли. \
                                Расскажите подробнее: что бы вы хотели изменить?"
                .to_string(),
            neutral_feedback: "Уточните, пожалуйста: подошли ли вам наши рекомендации?"
                .to_string(),
            human_agent_offer: "Рады, что вам понравилось! Хотите, чтобы с вами связался \
                                наш менеджер для оформления поездки? (да/нет)"
                .to_string(),
            closing_handoff: "Отлично! Наш менеджер свяжется с вами в ближайшее время. \
                              Спасибо, что воспользовались нашим сервисом!"
                .to_string(),
            closing_thanks: "Спасибо, что воспользовались нашим сервисом! Желаю вам счастливого пути!"
                .to_string(),
            retry: "Извините, я не совсем понял ваш ответ.\n\n\
                    Ответьте, пожалуйста, на вопрос про {topic}.\n\n\
                    Если вы не уверены или не готовы ответить сейчас, \
                    подскажите, когда лучше вернуться к этому вопросу."
                .to_string(),
            retry_topics: FieldNames {
                trip_type: "тип поездки (1, 2 или 3)".to_string(),
                destination: "место назначения (страна, город или курорт)".to_string(),
                group_size: "количество путешественников".to_string(),
                travel_dates: "даты поездки".to_string(),
                departure_city: "город отправления".to_string(),
            },
            max_errors_apology: "Приношу извинения, но мне не удаётся понять ваши ответы. \
                                 Попробуйте позже или обратитесь в нашу службу поддержки. \
                                 Спасибо за ваше время!"
                .to_string(),
            summary: SummaryText {
                header: "Уважаемый турист, вы ввели следующую информацию:".to_string(),
                footer: "Желаю вам счастливого пути!".to_string(),
                not_specified: "не указано".to_string(),
                labels: FieldNames {
                    trip_type: "Вы выбрали".to_string(),
                    destination: "Место назначения".to_string(),
                    group_size: "Количество человек".to_string(),
                    travel_dates: "Даты поездки".to_string(),
                    departure_city: "Город отправления".to_string(),
                },
                recommendation_heading: "Наши рекомендации:".to_string(),
                recommendation_failure: "К сожалению, сейчас не удалось подготовить рекомендации ({reason})."
                    .to_string(),
            },
        }
    }
}
