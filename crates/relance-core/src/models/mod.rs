pub mod alert;
pub mod backup;
pub mod practitioner;
pub mod question;
pub mod questionnaire;
pub mod response;
