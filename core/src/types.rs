//! Record types for the two resources served by the remote API.
//!
//! # Design
//! Rust field names are English; the serde renames carry the wire names the
//! API uses. Drafts are edited through `Record::set_field` over an enumerated
//! field type, so every editable field is matched exhaustively and a value
//! of the wrong kind is rejected instead of silently stored.
//!
//! Free-typed numeric inputs (`preco`, `num_imovel`) are kept as text so a
//! half-typed or non-numeric entry can live in the draft and be reported by
//! the validator rather than lost. `num_imovel` goes back out exactly as
//! typed; only `preco` is written as a JSON number.

use std::fmt;
use std::hash::Hash;

use chrono::Datelike;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;
use crate::mask::Mask;
use crate::validate::{self, Validation};

/// Server-assigned primary key.
pub type RecordId = i64;

/// Collections exposed by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Vehicles,
    Clients,
}

impl Resource {
    /// Path segment of the collection endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Vehicles => "karangos",
            Resource::Clients => "clientes",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// An editable field of a record.
pub trait Field: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    const ALL: &'static [Self];

    fn wire_name(self) -> &'static str;
}

/// A value typed into, picked in, or toggled on a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Checked(bool),
}

impl FieldValue {
    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Number(_) => "number",
            FieldValue::Checked(_) => "checkbox",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Checked(b)
    }
}

/// A flat record served by one `Resource`.
pub trait Record:
    Clone + Default + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + 'static
{
    type Field: Field;

    const RESOURCE: Resource;

    fn id(&self) -> Option<RecordId>;

    /// Apply a single form edit to the draft.
    fn set_field(&mut self, field: Self::Field, value: FieldValue) -> Result<(), FieldError>;

    /// Run every field rule against this snapshot.
    fn validate(&self) -> Validation<Self::Field>;
}

fn mismatch<F: Field>(field: F, value: &FieldValue) -> FieldError {
    FieldError::Mismatch {
        field: field.wire_name(),
        got: value.kind(),
    }
}

/// Text for fields that are typed freely but must hold a number.
fn numeric_text<F: Field>(field: F, value: FieldValue) -> Result<String, FieldError> {
    match value {
        FieldValue::Text(s) => Ok(s),
        FieldValue::Number(n) => Ok(n.to_string()),
        other => Err(mismatch(field, &other)),
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

/// Fixed body-color palette offered by the vehicle form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Amarelo,
    Azul,
    Bege,
    Branco,
    Cinza,
    Dourado,
    Laranja,
    Marrom,
    Prata,
    Preto,
    Rosa,
    Roxo,
    Verde,
    Vermelho,
    Vinho,
}

impl Color {
    pub const ALL: [Color; 15] = [
        Color::Amarelo,
        Color::Azul,
        Color::Bege,
        Color::Branco,
        Color::Cinza,
        Color::Dourado,
        Color::Laranja,
        Color::Marrom,
        Color::Prata,
        Color::Preto,
        Color::Rosa,
        Color::Roxo,
        Color::Verde,
        Color::Vermelho,
        Color::Vinho,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Color::Amarelo => "Amarelo",
            Color::Azul => "Azul",
            Color::Bege => "Bege",
            Color::Branco => "Branco",
            Color::Cinza => "Cinza",
            Color::Dourado => "Dourado",
            Color::Laranja => "Laranja",
            Color::Marrom => "Marrom",
            Color::Prata => "Prata",
            Color::Preto => "Preto",
            Color::Rosa => "Rosa",
            Color::Roxo => "Roxo",
            Color::Verde => "Verde",
            Color::Vermelho => "Vermelho",
            Color::Vinho => "Vinho",
        }
    }

    pub fn from_label(label: &str) -> Option<Color> {
        Color::ALL.into_iter().find(|c| c.label() == label)
    }
}

/// Boolean carried on the wire as `"0"` / `"1"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(pub bool);

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if self.0 { "1" } else { "0" })
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(Flag(b)),
            Raw::Int(0) => Ok(Flag(false)),
            Raw::Int(1) => Ok(Flag(true)),
            Raw::Text(s) if s == "0" => Ok(Flag(false)),
            Raw::Text(s) if s == "1" => Ok(Flag(true)),
            _ => Err(serde::de::Error::custom("expected \"0\" or \"1\"")),
        }
    }
}

/// Serde adapter for numeric text: reads numbers or strings, writes a JSON
/// number whenever the text parses as one.
mod number_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        let trimmed = value.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return serializer.serialize_i64(n);
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => serializer.serialize_f64(n),
            _ => serializer.serialize_str(value),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        })
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VehicleField {
    Brand,
    Model,
    Color,
    ManufactureYear,
    Imported,
    Plate,
    Price,
}

impl Field for VehicleField {
    const ALL: &'static [Self] = &[
        VehicleField::Brand,
        VehicleField::Model,
        VehicleField::Color,
        VehicleField::ManufactureYear,
        VehicleField::Imported,
        VehicleField::Plate,
        VehicleField::Price,
    ];

    fn wire_name(self) -> &'static str {
        match self {
            VehicleField::Brand => "marca",
            VehicleField::Model => "modelo",
            VehicleField::Color => "cor",
            VehicleField::ManufactureYear => "ano_fabricacao",
            VehicleField::Imported => "importado",
            VehicleField::Plate => "placa",
            VehicleField::Price => "preco",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "cor")]
    pub color: String,
    #[serde(rename = "ano_fabricacao")]
    pub manufacture_year: i32,
    #[serde(rename = "importado")]
    pub imported: Flag,
    #[serde(rename = "placa")]
    pub plate: String,
    #[serde(rename = "preco", with = "number_text")]
    pub price: String,
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            id: None,
            brand: String::new(),
            model: String::new(),
            color: String::new(),
            manufacture_year: current_year(),
            imported: Flag(false),
            plate: String::new(),
            price: "0".to_string(),
        }
    }
}

impl Vehicle {
    /// Price in Brazilian currency notation, e.g. `R$ 35.000,00`.
    pub fn price_label(&self) -> Option<String> {
        let value = self.price.trim().parse::<f64>().ok()?;
        Some(format_brl(value))
    }
}

impl Record for Vehicle {
    type Field = VehicleField;

    const RESOURCE: Resource = Resource::Vehicles;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_field(&mut self, field: VehicleField, value: FieldValue) -> Result<(), FieldError> {
        match (field, value) {
            (VehicleField::Brand, FieldValue::Text(s)) => self.brand = s,
            (VehicleField::Model, FieldValue::Text(s)) => self.model = s,
            (VehicleField::Color, FieldValue::Text(s)) => self.color = s,
            (VehicleField::ManufactureYear, FieldValue::Number(n)) => {
                self.manufacture_year = i32::try_from(n).map_err(|_| FieldError::NotANumber {
                    field: field.wire_name(),
                    input: n.to_string(),
                })?;
            }
            (VehicleField::ManufactureYear, FieldValue::Text(s)) => {
                self.manufacture_year =
                    s.trim().parse().map_err(|_| FieldError::NotANumber {
                        field: field.wire_name(),
                        input: s.clone(),
                    })?;
            }
            (VehicleField::Imported, FieldValue::Checked(b)) => self.imported = Flag(b),
            (VehicleField::Plate, FieldValue::Text(s)) => self.plate = Mask::plate().apply(&s),
            (VehicleField::Price, value) => self.price = numeric_text(field, value)?,
            (field, value) => return Err(mismatch(field, &value)),
        }
        Ok(())
    }

    fn validate(&self) -> Validation<VehicleField> {
        validate::vehicle(self, current_year())
    }
}

fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{:02}", cents % 100)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientField {
    Name,
    Cpf,
    Rg,
    Street,
    HouseNumber,
    Complement,
    Neighborhood,
    Municipality,
    State,
    Phone,
    Email,
}

impl Field for ClientField {
    const ALL: &'static [Self] = &[
        ClientField::Name,
        ClientField::Cpf,
        ClientField::Rg,
        ClientField::Street,
        ClientField::HouseNumber,
        ClientField::Complement,
        ClientField::Neighborhood,
        ClientField::Municipality,
        ClientField::State,
        ClientField::Phone,
        ClientField::Email,
    ];

    fn wire_name(self) -> &'static str {
        match self {
            ClientField::Name => "nome",
            ClientField::Cpf => "cpf",
            ClientField::Rg => "rg",
            ClientField::Street => "logradouro",
            ClientField::HouseNumber => "num_imovel",
            ClientField::Complement => "complemento",
            ClientField::Neighborhood => "bairro",
            ClientField::Municipality => "municipio",
            ClientField::State => "uf",
            ClientField::Phone => "telefone",
            ClientField::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    pub rg: String,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "num_imovel", deserialize_with = "number_text::deserialize")]
    pub house_number: String,
    #[serde(rename = "complemento", default, deserialize_with = "null_as_empty")]
    pub complement: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "municipio")]
    pub municipality: String,
    #[serde(rename = "uf")]
    pub state: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
}

impl Record for Client {
    type Field = ClientField;

    const RESOURCE: Resource = Resource::Clients;

    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn set_field(&mut self, field: ClientField, value: FieldValue) -> Result<(), FieldError> {
        if field == ClientField::HouseNumber {
            self.house_number = numeric_text(field, value)?;
            return Ok(());
        }
        let FieldValue::Text(s) = value else {
            return Err(mismatch(field, &value));
        };
        match field {
            ClientField::Name => self.name = s,
            ClientField::Cpf => self.cpf = Mask::cpf().apply(&s),
            ClientField::Rg => self.rg = Mask::rg().apply(&s),
            ClientField::Street => self.street = s,
            ClientField::HouseNumber => self.house_number = s,
            ClientField::Complement => self.complement = s,
            ClientField::Neighborhood => self.neighborhood = s,
            ClientField::Municipality => self.municipality = s,
            ClientField::State => self.state = s,
            ClientField::Phone => self.phone = s,
            ClientField::Email => self.email = s,
        }
        Ok(())
    }

    fn validate(&self) -> Validation<ClientField> {
        validate::client(self)
    }
}
