// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use serde::Deserialize;
use serde::Serialize;

#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// German.
    #[default]
    De,
    /// English.
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Every user-facing string in the front end.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Text {
    AppTitle,
    // Authentication.
    Login,
    Register,
    Logout,
    Username,
    Password,
    ConfirmPassword,
    Email,
    LoggedInAs,
    LoginSuccessful,
    LoginFailedCheckCredentials,
    LoginFailedTryLater,
    LoggedOut,
    PleaseEnterCredentials,
    PleaseFillAllFields,
    PasswordsDoNotMatch,
    PasswordMinLength,
    PleaseEnterValidEmail,
    RegistrationSuccessful,
    RegistrationEmailVerification,
    RegistrationEmailFailed,
    RegistrationFailed,
    RegistrationFailedTryLater,
    UserAlreadyExists,
    PasswordTooWeak,
    UsernameInvalid,
    // Menu.
    Home,
    Welcome,
    CardsMenu,
    Learn,
    ManageCards,
    NewCard,
    Topics,
    Exams,
    Assessments,
    Images,
    Materials,
    Management,
    UserManagement,
    GroupManagement,
    RoleManagement,
    ProductManagement,
    TechnicalInfo,
    StorageMigration,
    ManagedElsewhere,
    // Common.
    Save,
    Cancel,
    Edit,
    Delete,
    Add,
    Remove,
    Name,
    Actions,
    ConfirmDelete,
    Unknown,
    Saved,
    Deleted,
    PageNotFound,
    PleaseEnterName,
    // Backend errors.
    InvalidParameters,
    NotAuthorized,
    NetworkError,
    InvalidResponse,
    NotSignedIn,
    ResourceNotFound,
    // Cards.
    Title,
    Question,
    Answers,
    Correct,
    Topic,
    Difficulty,
    Image,
    NoImage,
    NoCards,
    PleaseEnterTitle,
    PleaseEnterQuestion,
    PleaseSelectTopic,
    MinTwoAnswers,
    OneCorrectAnswer,
    InvalidDifficulty,
    Rate,
    Comment,
    RecordStroke,
    StrokeSaved,
    AllTopics,
    Filter,
    CheckAnswers,
    AnswersCorrect,
    AnswersIncorrect,
    QuestionImage,
    ImageError,
    // Topics.
    NewTopic,
    NoTopics,
    // Exams.
    NewExam,
    Duration,
    Minutes,
    Seconds,
    CardCount,
    PleaseEnterDuration,
    DurationTooLong,
    NoExams,
    AssignedCards,
    AvailableCards,
    // Assessments.
    NewAssessment,
    Exam,
    StartTime,
    EndTime,
    Participants,
    PleaseSelectExam,
    PleaseEnterValidTimeframe,
    EndMustBeAfterStart,
    NoAssessments,
    AssignedUsers,
    AvailableUsers,
    // Taking exams.
    TakeExams,
    NoExamsAvailable,
    ContactInstructor,
    Questions,
    Status,
    StatusAssigned,
    StatusStarted,
    StatusPaused,
    StatusCompleted,
    StatusCancelled,
    StartExam,
    ContinueExam,
    ShowResult,
    PauseExam,
    SubmitExam,
    ConfirmStartExam,
    ConfirmSubmitExam,
    ExamPaused,
    ExamSubmitted,
    ExamResult,
    TimeLeft,
    TimeRequired,
    CorrectAnswers,
    IncorrectAnswers,
    TotalQuestions,
    RateYourKnowledge,
    // Images.
    Upload,
    NoImages,
    PleaseChooseFile,
    // Materials.
    Search,
    Clear,
    SearchPlaceholder,
    AllPackages,
    NoMaterialsFound,
    LoadingMore,
    NoMoreMaterials,
    Of,
    ElementsLoaded,
    LoadMore,
}

/// Translates `text` into `lang`.
pub fn t(lang: Language, text: Text) -> &'static str {
    let (de, en) = catalogue(text);
    match lang {
        Language::De => de,
        Language::En => en,
    }
}

fn catalogue(text: Text) -> (&'static str, &'static str) {
    match text {
        Text::AppTitle => ("Lernkarten", "Learning cards"),
        Text::Login => ("Anmelden", "Sign in"),
        Text::Register => ("Registrieren", "Register"),
        Text::Logout => ("Abmelden", "Sign out"),
        Text::Username => ("Benutzername", "Username"),
        Text::Password => ("Passwort", "Password"),
        Text::ConfirmPassword => ("Passwort bestätigen", "Confirm password"),
        Text::Email => ("E-Mail", "Email"),
        Text::LoggedInAs => ("Angemeldet als", "Signed in as"),
        Text::LoginSuccessful => ("Anmeldung erfolgreich", "Signed in successfully"),
        Text::LoginFailedCheckCredentials => (
            "Anmeldung fehlgeschlagen. Bitte Zugangsdaten prüfen.",
            "Sign-in failed. Please check your credentials.",
        ),
        Text::LoginFailedTryLater => (
            "Anmeldung fehlgeschlagen. Bitte später erneut versuchen.",
            "Sign-in failed. Please try again later.",
        ),
        Text::LoggedOut => ("Erfolgreich abgemeldet", "Signed out successfully"),
        Text::PleaseEnterCredentials => (
            "Bitte Benutzername und Passwort eingeben",
            "Please enter username and password",
        ),
        Text::PleaseFillAllFields => ("Bitte alle Felder ausfüllen", "Please fill in all fields"),
        Text::PasswordsDoNotMatch => (
            "Die Passwörter stimmen nicht überein",
            "Passwords do not match",
        ),
        Text::PasswordMinLength => (
            "Das Passwort muss mindestens 6 Zeichen lang sein",
            "The password must be at least 6 characters long",
        ),
        Text::PleaseEnterValidEmail => (
            "Bitte eine gültige E-Mail-Adresse eingeben",
            "Please enter a valid email address",
        ),
        Text::RegistrationSuccessful => ("Registrierung erfolgreich", "Registration successful"),
        Text::RegistrationEmailVerification => (
            "Registrierung erfolgreich. Bitte bestätigen Sie Ihre E-Mail-Adresse.",
            "Registration successful. Please verify your email address.",
        ),
        Text::RegistrationEmailFailed => (
            "Registrierung erfolgreich, aber die Bestätigungs-E-Mail konnte nicht gesendet werden.",
            "Registration successful, but the verification email could not be sent.",
        ),
        Text::RegistrationFailed => (
            "Registrierung fehlgeschlagen. Bitte erneut versuchen.",
            "Registration failed. Please try again.",
        ),
        Text::RegistrationFailedTryLater => (
            "Registrierung fehlgeschlagen. Bitte später erneut versuchen.",
            "Registration failed. Please try again later.",
        ),
        Text::UserAlreadyExists => (
            "Dieser Benutzer existiert bereits",
            "This user already exists",
        ),
        Text::PasswordTooWeak => ("Das Passwort ist zu schwach", "The password is too weak"),
        Text::UsernameInvalid => ("Der Benutzername ist ungültig", "The username is invalid"),
        Text::Home => ("Start", "Home"),
        Text::Welcome => ("Willkommen", "Welcome"),
        Text::CardsMenu => ("Lernkarten", "Learning cards"),
        Text::Learn => ("Lernen", "Learn"),
        Text::ManageCards => ("Karten verwalten", "Manage cards"),
        Text::NewCard => ("Neue Karte", "New card"),
        Text::Topics => ("Themen", "Topics"),
        Text::Exams => ("Prüfungen", "Exams"),
        Text::Assessments => ("Prüfungstermine", "Assessments"),
        Text::Images => ("Bilder", "Images"),
        Text::Materials => ("Lernmaterial", "Learning materials"),
        Text::Management => ("Verwaltung", "Management"),
        Text::UserManagement => ("Benutzer", "Users"),
        Text::GroupManagement => ("Gruppen", "Groups"),
        Text::RoleManagement => ("Rollen", "Roles"),
        Text::ProductManagement => ("Produkte", "Products"),
        Text::TechnicalInfo => ("Technische Informationen", "Technical information"),
        Text::StorageMigration => ("Speichermigration", "Storage migration"),
        Text::ManagedElsewhere => (
            "wird in der Administrationsoberfläche verwaltet",
            "managed in the administration console",
        ),
        Text::Save => ("Speichern", "Save"),
        Text::Cancel => ("Abbrechen", "Cancel"),
        Text::Edit => ("Bearbeiten", "Edit"),
        Text::Delete => ("Löschen", "Delete"),
        Text::Add => ("Hinzufügen", "Add"),
        Text::Remove => ("Entfernen", "Remove"),
        Text::Name => ("Name", "Name"),
        Text::Actions => ("Aktionen", "Actions"),
        Text::ConfirmDelete => ("Wirklich löschen?", "Really delete?"),
        Text::Unknown => ("Unbekannt", "Unknown"),
        Text::Saved => ("Gespeichert", "Saved"),
        Text::Deleted => ("Gelöscht", "Deleted"),
        Text::PageNotFound => ("Seite nicht gefunden", "Page not found"),
        Text::PleaseEnterName => ("Bitte einen Namen eingeben", "Please enter a name"),
        Text::InvalidParameters => ("Ungültige Parameter", "Invalid parameters"),
        Text::NotAuthorized => ("Nicht autorisiert", "Not authorized"),
        Text::NetworkError => ("Netzwerkfehler", "Network error"),
        Text::InvalidResponse => ("Ungültige Antwort vom Server", "Invalid response from server"),
        Text::NotSignedIn => ("Bitte melden Sie sich an", "Please sign in"),
        Text::ResourceNotFound => ("Nicht gefunden", "Not found"),
        Text::Title => ("Titel", "Title"),
        Text::Question => ("Frage", "Question"),
        Text::Answers => ("Antworten", "Answers"),
        Text::Correct => ("Richtig", "Correct"),
        Text::Topic => ("Thema", "Topic"),
        Text::Difficulty => ("Schwierigkeit", "Difficulty"),
        Text::Image => ("Bild", "Image"),
        Text::NoImage => ("Kein Bild", "No image"),
        Text::NoCards => ("Keine Karten gefunden", "No cards found"),
        Text::PleaseEnterTitle => ("Bitte einen Titel eingeben", "Please enter a title"),
        Text::PleaseEnterQuestion => ("Bitte eine Frage eingeben", "Please enter a question"),
        Text::PleaseSelectTopic => ("Bitte ein Thema auswählen", "Please select a topic"),
        Text::MinTwoAnswers => (
            "Mindestens zwei Antworten sind erforderlich",
            "At least two answers are required",
        ),
        Text::OneCorrectAnswer => (
            "Mindestens eine Antwort muss richtig sein",
            "At least one answer must be correct",
        ),
        Text::InvalidDifficulty => (
            "Die Schwierigkeit muss zwischen 1 und 5 liegen",
            "Difficulty must be between 1 and 5",
        ),
        Text::Rate => ("Rate", "Rate"),
        Text::Comment => ("Kommentar", "Comment"),
        Text::RecordStroke => ("Strich setzen", "Record attempt"),
        Text::StrokeSaved => ("Strich gespeichert", "Attempt recorded"),
        Text::AllTopics => ("Alle Gebiete", "All areas"),
        Text::Filter => ("Filtern", "Filter"),
        Text::CheckAnswers => ("Stimmts?", "Is it correct?"),
        Text::AnswersCorrect => (
            "Richtig! Alle Antworten sind korrekt gewählt.",
            "Correct! All answers are correctly chosen.",
        ),
        Text::AnswersIncorrect => (
            "Leider falsch. Überprüfe deine Auswahl noch einmal.",
            "Unfortunately wrong. Check your selection again.",
        ),
        Text::QuestionImage => ("Frage-Bild", "Question image"),
        Text::ImageError => ("Fehler beim Laden des Bildes", "Error loading image"),
        Text::NewTopic => ("Neues Thema", "New topic"),
        Text::NoTopics => ("Keine Themen gefunden", "No topics found"),
        Text::NewExam => ("Neue Prüfung", "New exam"),
        Text::Duration => ("Dauer", "Duration"),
        Text::Minutes => ("Minuten", "Minutes"),
        Text::Seconds => ("Sekunden", "Seconds"),
        Text::CardCount => ("Karten", "Cards"),
        Text::PleaseEnterDuration => ("Bitte eine Dauer angeben", "Please enter a duration"),
        Text::DurationTooLong => ("Die Dauer ist zu lang", "The duration is too long"),
        Text::NoExams => ("Keine Prüfungen gefunden", "No exams found"),
        Text::AssignedCards => ("Zugeordnete Karten", "Assigned cards"),
        Text::AvailableCards => ("Verfügbare Karten", "Available cards"),
        Text::NewAssessment => ("Neuer Prüfungstermin", "New assessment"),
        Text::Exam => ("Prüfung", "Exam"),
        Text::StartTime => ("Beginn", "Start"),
        Text::EndTime => ("Ende", "End"),
        Text::Participants => ("Teilnehmer", "Participants"),
        Text::PleaseSelectExam => ("Bitte zuerst eine Prüfung auswählen", "Please select an exam first"),
        Text::PleaseEnterValidTimeframe => (
            "Bitte einen gültigen Zeitraum angeben",
            "Please enter a valid time frame",
        ),
        Text::EndMustBeAfterStart => (
            "Das Ende muss nach dem Beginn liegen",
            "The end must be after the start",
        ),
        Text::NoAssessments => ("Keine Prüfungstermine gefunden", "No assessments found"),
        Text::AssignedUsers => ("Zugeordnete Teilnehmer", "Assigned participants"),
        Text::AvailableUsers => ("Verfügbare Benutzer", "Available users"),
        Text::TakeExams => ("Prüfungen ablegen", "Take exams"),
        Text::NoExamsAvailable => ("Keine Prüfungen verfügbar", "No exams available"),
        Text::ContactInstructor => (
            "Kontaktieren Sie Ihren Dozenten oder Administrator für weitere Informationen.",
            "Contact your instructor or administrator for more information.",
        ),
        Text::Questions => ("Fragen", "Questions"),
        Text::Status => ("Status", "Status"),
        Text::StatusAssigned => ("Zugewiesen", "Assigned"),
        Text::StatusStarted => ("In Bearbeitung", "In progress"),
        Text::StatusPaused => ("Pausiert", "Paused"),
        Text::StatusCompleted => ("Abgeschlossen", "Completed"),
        Text::StatusCancelled => ("Abgebrochen", "Cancelled"),
        Text::StartExam => ("Prüfung starten", "Start exam"),
        Text::ContinueExam => ("Fortsetzen", "Continue"),
        Text::ShowResult => ("Ergebnis anzeigen", "Show result"),
        Text::PauseExam => ("Prüfung pausieren", "Pause exam"),
        Text::SubmitExam => ("Prüfung abgeben", "Submit exam"),
        Text::ConfirmStartExam => (
            "Möchten Sie diese Prüfung jetzt starten? Die Zeit läuft ab dem Start.",
            "Do you want to start this exam now? The time runs from the start.",
        ),
        Text::ConfirmSubmitExam => (
            "Möchten Sie die Prüfung wirklich abgeben?",
            "Do you really want to submit the exam?",
        ),
        Text::ExamPaused => (
            "Prüfung wurde pausiert. Sie können sie später fortsetzen.",
            "The exam was paused. You can continue it later.",
        ),
        Text::ExamSubmitted => ("Prüfung abgegeben", "Exam submitted"),
        Text::ExamResult => ("Prüfungsergebnis", "Exam result"),
        Text::TimeLeft => ("Verbleibende Zeit", "Time left"),
        Text::TimeRequired => ("Benötigte Zeit", "Time required"),
        Text::CorrectAnswers => ("Richtig beantwortet", "Correct answers"),
        Text::IncorrectAnswers => ("Falsch beantwortet", "Incorrect answers"),
        Text::TotalQuestions => ("Gesamtfragen", "Total questions"),
        Text::RateYourKnowledge => (
            "Bewerten Sie Ihr Wissen zu den einzelnen Antworten:",
            "Rate your knowledge of each answer:",
        ),
        Text::Upload => ("Hochladen", "Upload"),
        Text::NoImages => ("Keine Bilder gefunden", "No images found"),
        Text::PleaseChooseFile => ("Bitte eine Datei auswählen", "Please choose a file"),
        Text::Search => ("Suchen", "Search"),
        Text::Clear => ("Zurücksetzen", "Clear"),
        Text::SearchPlaceholder => ("Material suchen...", "Search materials..."),
        Text::AllPackages => ("Alle Pakete", "All packages"),
        Text::NoMaterialsFound => ("Keine Materialien gefunden", "No materials found"),
        Text::LoadingMore => (
            "Weitere Materialien werden geladen...",
            "Loading more materials...",
        ),
        Text::NoMoreMaterials => ("Keine weiteren Materialien", "No more materials"),
        Text::Of => ("von", "of"),
        Text::ElementsLoaded => ("geladen", "loaded"),
        Text::LoadMore => ("Mehr laden", "Load more"),
    }
}
