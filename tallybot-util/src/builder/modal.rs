use twilight_model::{
    channel::message::component::{ActionRow, Component, TextInput, TextInputStyle},
    http::interaction::InteractionResponseData,
};

/// Modal with a single text input.
#[derive(Clone, Debug)]
pub struct ModalBuilder {
    custom_id: String,
    input: TextInput,
    title: String,
}

impl ModalBuilder {
    pub fn new(custom_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            input: TextInput {
                custom_id: String::new(),
                label: String::new(),
                max_length: None,
                min_length: None,
                placeholder: None,
                required: Some(true),
                style: TextInputStyle::Short,
                value: None,
            },
            title: title.into(),
        }
    }

    pub fn input(mut self, custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.input.custom_id = custom_id.into();
        self.input.label = label.into();

        self
    }

    pub fn max_len(mut self, len: u16) -> Self {
        self.input.max_length = Some(len);

        self
    }

    pub fn min_len(mut self, len: u16) -> Self {
        self.input.min_length = Some(len);

        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.input.placeholder = Some(placeholder.into());

        self
    }

    pub fn custom_id(&self) -> &str {
        &self.custom_id
    }

    pub fn input_id(&self) -> &str {
        &self.input.custom_id
    }

    pub fn build(self) -> InteractionResponseData {
        let row = ActionRow {
            components: vec![Component::TextInput(self.input)],
        };

        InteractionResponseData {
            components: Some(vec![Component::ActionRow(row)]),
            custom_id: Some(self.custom_id),
            title: Some(self.title),
            ..Default::default()
        }
    }
}
