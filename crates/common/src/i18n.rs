//! Locale-keyed message tables.
//!
//! Two locales are supported. Switching locale must only change displayed
//! text: element test identifiers and page behavior never vary with it.

use crate::Locale;

/// Keys for every user-visible string on the testing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    NavHome,
    NavLogin,
    NavAsync,
    NavUi,
    NavFormsBasic,
    NavFormsDynamic,
    NavCalendar,
    NavTables,
    NavUsers,

    IndexTitle,
    IndexIntro,

    LoginTitle,
    LoginSubtitle,
    LoginUsernameLabel,
    LoginPasswordLabel,
    LoginSubmit,
    LoginSubmitPending,
    LoginHintUser,
    LoginHintPass,
    LoginError,
    LoginSuccessTitle,
    LoginSuccessBody,
    LoginSuccessClose,

    AsyncTitle,
    AsyncLoaderStart,
    AsyncLoaderPending,
    AsyncLoaderDone,
    AsyncAppearStart,
    AsyncAppearRevealed,
    AsyncDisappearStart,
    AsyncDisappearTarget,

    UiTitle,
    UiOpenModal,
    UiModalTitle,
    UiModalBody,
    UiModalAccept,
    UiModalCancel,
    UiToastSuccessBtn,
    UiToastErrorBtn,
    UiToastSuccess,
    UiToastError,
    UiTooltipText,
    UiContextZone,

    FormsTitle,
    FormsEmailLabel,
    FormsSelectLabel,
    FormsTermsLabel,
    FormsSubmit,
    FormsReset,
    FormsSubmitted,
    FormsErrorRequired,
    FormsErrorEmail,

    DynamicFormsTitle,
    CalendarTitle,

    TablesTitle,
    TablesSearchPlaceholder,
    TablesSummary,
    TablesEmpty,
    TablesPrev,
    TablesNext,
    TablesPageOf,

    UsersTitle,
    UsersSubtitle,
    UsersNew,
    UsersEdit,
    UsersDelete,
    UsersSave,
    UsersCancel,
    UsersEmpty,
    UsersConfirmDelete,
    UsersOperationFailed,
}

impl Msg {
    /// Resolve this message for a locale.
    pub fn text(self, locale: Locale) -> &'static str {
        let (en, es) = self.pair();
        match locale {
            Locale::En => en,
            Locale::Es => es,
        }
    }

    fn pair(self) -> (&'static str, &'static str) {
        use Msg::*;
        match self {
            NavHome => ("Home", "Inicio"),
            NavLogin => ("Login", "Acceso"),
            NavAsync => ("Async", "Asincronía"),
            NavUi => ("UI Components", "Componentes UI"),
            NavFormsBasic => ("Basic Forms", "Formularios Clásicos"),
            NavFormsDynamic => ("Dynamic Forms", "Formularios Dinámicos"),
            NavCalendar => ("Calendars", "Calendarios"),
            NavTables => ("Tables", "Tablas"),
            NavUsers => ("Users", "Usuarios"),

            IndexTitle => ("QA Testing Playgrounds", "Escenarios de Pruebas QA"),
            IndexIntro => (
                "Practice surfaces for UI test automation: forms, tables, timers and dialogs.",
                "Superficies de práctica para automatización de pruebas: formularios, tablas, temporizadores y diálogos.",
            ),

            LoginTitle => ("QA Access", "Acceso QA"),
            LoginSubtitle => (
                "Login simulation for automated testing.",
                "Simulación de inicio de sesión para pruebas automatizadas.",
            ),
            LoginUsernameLabel => ("Username", "Usuario"),
            LoginPasswordLabel => ("Password", "Contraseña"),
            LoginSubmit => ("Sign in", "Entrar al sistema"),
            LoginSubmitPending => ("Verifying...", "Verificando..."),
            LoginHintUser => ("QA tip: use the username", "Tip de QA: usa el usuario"),
            LoginHintPass => ("QA tip: the assigned password is", "Tip de QA: la contraseña asignada es"),
            LoginError => (
                "Incorrect username or password. Check the credentials.",
                "Usuario o contraseña incorrectos. Verifica las credenciales.",
            ),
            LoginSuccessTitle => ("Access Granted!", "¡Acceso Concedido!"),
            LoginSuccessBody => (
                "Login succeeded. You passed the automation scenario.",
                "El login ha sido exitoso. Has pasado el escenario de automatización correctamente.",
            ),
            LoginSuccessClose => ("Close simulation", "Cerrar Simulación"),

            AsyncTitle => ("Async Interactions", "Interacciones Asíncronas"),
            AsyncLoaderStart => ("Start async request", "Iniciar Petición Asíncrona"),
            AsyncLoaderPending => ("Processing...", "Procesando..."),
            AsyncLoaderDone => (
                "Request completed successfully.",
                "Petición completada exitosamente.",
            ),
            AsyncAppearStart => ("Start timer (5s)", "Iniciar Temporizador (5s)"),
            AsyncAppearRevealed => ("Element revealed.", "Elemento revelado."),
            AsyncDisappearStart => ("Remove element (5s)", "Eliminar Elemento (5s)"),
            AsyncDisappearTarget => (
                "This element will disappear soon.",
                "Este elemento desaparecerá pronto.",
            ),

            UiTitle => ("Floating UI Components", "Componentes UI Flotantes"),
            UiOpenModal => ("Open simple modal", "Abrir Modal Simple"),
            UiModalTitle => ("Terms of Service", "Términos de Servicio"),
            UiModalBody => (
                "Please accept the terms of service before continuing.",
                "Por favor acepta los términos de servicio antes de continuar.",
            ),
            UiModalAccept => ("Accept", "Aceptar"),
            UiModalCancel => ("Cancel", "Cancelar"),
            UiToastSuccessBtn => ("Success toast", "Toast de Éxito"),
            UiToastErrorBtn => ("Error toast", "Toast de Error"),
            UiToastSuccess => (
                "Operation completed successfully.",
                "Operación completada con éxito.",
            ),
            UiToastError => (
                "There was an error processing the request.",
                "Hubo un error al procesar la solicitud.",
            ),
            UiTooltipText => (
                "This is the hidden tooltip text.",
                "Este es el texto oculto del tooltip.",
            ),
            UiContextZone => ("Right-click here", "Haz Click Derecho aquí"),

            FormsTitle => ("Classic Forms", "Formularios Clásicos"),
            FormsEmailLabel => ("Email *", "Correo Electrónico *"),
            FormsSelectLabel => ("Classic selector *", "Selector Clásico *"),
            FormsTermsLabel => (
                "I accept the terms and conditions *",
                "Acepto los términos y condiciones *",
            ),
            FormsSubmit => ("Submit form", "Enviar Formulario"),
            FormsReset => ("Reset", "Limpiar"),
            FormsSubmitted => (
                "Form submitted successfully",
                "Formulario enviado correctamente",
            ),
            FormsErrorRequired => ("This field is required", "Este campo es obligatorio"),
            FormsErrorEmail => ("Must be a valid email", "Debe ser un email válido"),

            DynamicFormsTitle => ("Dynamic Forms", "Formularios Dinámicos"),
            CalendarTitle => ("Calendar Testing", "Testing de Calendarios"),

            TablesTitle => ("Tables and Data", "Tablas y Datos"),
            TablesSearchPlaceholder => (
                "Search by name, email or role...",
                "Buscar por nombre, email o rol...",
            ),
            TablesSummary => ("Showing", "Mostrando"),
            TablesEmpty => ("No results found for", "No se encontraron resultados para"),
            TablesPrev => ("Previous", "Anterior"),
            TablesNext => ("Next", "Siguiente"),
            TablesPageOf => ("Page", "Página"),

            UsersTitle => ("User Management", "Gestión de Usuarios"),
            UsersSubtitle => ("User CRUD backed by SQLite.", "CRUD de usuarios con SQLite."),
            UsersNew => ("New User", "Nuevo Usuario"),
            UsersEdit => ("Edit", "Editar"),
            UsersDelete => ("Delete", "Eliminar"),
            UsersSave => ("Save", "Guardar"),
            UsersCancel => ("Cancel", "Cancelar"),
            UsersEmpty => (
                "No users. Create the first one.",
                "No hay usuarios. Crea el primero.",
            ),
            UsersConfirmDelete => (
                "Are you sure you want to delete this user?",
                "¿Estás seguro de eliminar este usuario?",
            ),
            UsersOperationFailed => ("Operation failed", "La operación falló"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [Msg; 8] = [
        Msg::LoginTitle,
        Msg::LoginError,
        Msg::LoginSuccessTitle,
        Msg::AsyncLoaderDone,
        Msg::UiToastSuccess,
        Msg::TablesEmpty,
        Msg::UsersConfirmDelete,
        Msg::FormsErrorEmail,
    ];

    #[test]
    fn every_message_exists_in_both_locales() {
        for msg in SAMPLE {
            assert!(!msg.text(Locale::En).is_empty());
            assert!(!msg.text(Locale::Es).is_empty());
        }
    }

    #[test]
    fn locales_diverge_in_text_only() {
        assert_ne!(Msg::LoginTitle.text(Locale::En), Msg::LoginTitle.text(Locale::Es));
    }
}
