use serde::{Deserialize, Serialize};

/// When a trigger fires relative to its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerTiming {
    /// Fires before the change
    Before,
    /// Fires after the change
    #[default]
    After,
    /// Replaces the change (views)
    InsteadOf,
}

impl TriggerTiming {
    /// Parses catalog text; unknown values read as `After`.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "BEFORE" => Self::Before,
            "INSTEAD_OF" | "INSTEAD OF" => Self::InsteadOf,
            _ => Self::After,
        }
    }
}

/// Data change that fires a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerEvent {
    /// Row insert
    #[default]
    Insert,
    /// Row update
    Update,
    /// Row delete
    Delete,
    /// Table truncate
    Truncate,
}

impl TriggerEvent {
    /// Parses catalog text; unknown values read as `Insert`.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "TRUNCATE" => Self::Truncate,
            _ => Self::Insert,
        }
    }
}

/// Trigger attached to a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    name: String,
    table_name: String,
    timing: TriggerTiming,
    event: TriggerEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    definition: Option<String>,
    enabled: bool,
}

impl Trigger {
    /// Starts a trigger on `table_name`
    pub fn builder(name: impl Into<String>, table_name: impl Into<String>) -> TriggerBuilder {
        TriggerBuilder {
            name: name.into(),
            table_name: table_name.into(),
            timing: TriggerTiming::default(),
            event: TriggerEvent::default(),
            definition: None,
            enabled: true,
        }
    }

    /// Trigger name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table the trigger is attached to
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// When it fires
    pub fn timing(&self) -> TriggerTiming {
        self.timing
    }

    /// What fires it
    pub fn event(&self) -> TriggerEvent {
        self.event
    }

    /// Trigger body or action statement
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// Whether the trigger currently fires
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Staging value for [`Trigger`].
#[derive(Debug, Clone)]
#[must_use]
pub struct TriggerBuilder {
    name: String,
    table_name: String,
    timing: TriggerTiming,
    event: TriggerEvent,
    definition: Option<String>,
    enabled: bool,
}

impl TriggerBuilder {
    /// Sets the timing
    pub fn timing(mut self, timing: TriggerTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Sets the firing event
    pub fn event(mut self, event: TriggerEvent) -> Self {
        self.event = event;
        self
    }

    /// Sets the body
    pub fn definition(mut self, definition: Option<String>) -> Self {
        self.definition = definition;
        self
    }

    /// Sets whether the trigger fires
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Finishes the trigger
    pub fn build(self) -> Trigger {
        Trigger {
            name: self.name,
            table_name: self.table_name,
            timing: self.timing,
            event: self.event,
            definition: self.definition,
            enabled: self.enabled,
        }
    }
}

/// Kind of stored routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcedureKind {
    /// Returns no value
    #[default]
    Procedure,
    /// Returns a value
    Function,
}

/// Direction of a routine parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterMode {
    /// Input
    #[default]
    In,
    /// Output
    Out,
    /// Input and output
    Inout,
    /// Return value slot
    Return,
}

impl ParameterMode {
    /// Maps a portable parameter kind code. Unknown (0) and result-column
    /// (3) codes read as `In`.
    pub fn from_kind_code(code: i16) -> Self {
        match code {
            2 => Self::Inout,
            4 => Self::Out,
            5 => Self::Return,
            _ => Self::In,
        }
    }

    /// Parses catalog text; unknown values read as `In`.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "OUT" => Self::Out,
            "INOUT" | "IN/OUT" => Self::Inout,
            "RETURN" => Self::Return,
            _ => Self::In,
        }
    }
}

/// One routine parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name; empty for unnamed slots
    pub name: String,
    /// Vendor type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Direction
    pub mode: ParameterMode,
    /// 1-based position
    pub position: u32,
}

/// Stored procedure or function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    name: String,
    kind: ProcedureKind,
    parameters: Box<[Parameter]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    return_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl Procedure {
    /// Starts a procedure with the given name
    pub fn builder(name: impl Into<String>) -> ProcedureBuilder {
        ProcedureBuilder {
            name: name.into(),
            kind: ProcedureKind::default(),
            parameters: Vec::new(),
            return_type: None,
            definition: None,
            comment: None,
        }
    }

    /// Routine name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Procedure or function
    pub fn kind(&self) -> ProcedureKind {
        self.kind
    }

    /// Parameters in declaration order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Declared result type of a function
    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }

    /// Routine body
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// Routine comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Staging value for [`Procedure`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ProcedureBuilder {
    name: String,
    kind: ProcedureKind,
    parameters: Vec<Parameter>,
    return_type: Option<String>,
    definition: Option<String>,
    comment: Option<String>,
}

impl ProcedureBuilder {
    /// Sets the routine kind
    pub fn kind(mut self, kind: ProcedureKind) -> Self {
        self.kind = kind;
        self
    }

    /// Appends one parameter
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        data_type: Option<String>,
        mode: ParameterMode,
        position: u32,
    ) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            data_type,
            mode,
            position,
        });
        self
    }

    /// Appends parameters
    pub fn parameters(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Sets the result type
    pub fn return_type(mut self, return_type: Option<String>) -> Self {
        self.return_type = return_type;
        self
    }

    /// Sets the body
    pub fn definition(mut self, definition: Option<String>) -> Self {
        self.definition = definition;
        self
    }

    /// Sets the comment
    pub fn comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Finishes the procedure
    pub fn build(self) -> Procedure {
        Procedure {
            name: self.name,
            kind: self.kind,
            parameters: self.parameters.into_boxed_slice(),
            return_type: self.return_type,
            definition: self.definition,
            comment: self.comment,
        }
    }
}
