//! Macros for reducing boilerplate when defining entities
//!
//! Every record struct carries `id`, `created_at` and `updated_at`; these
//! macros generate the repetitive trait implementations on top of them.

/// Implement [`Entity`](crate::core::entity::Entity) for a record struct
///
/// The struct must have `id: Uuid`, `created_at` and `updated_at` fields.
/// Each field listed under `fields` becomes searchable through
/// `Entity::field_value` and must convert into a `FieldValue` by reference.
///
/// # Example
///
/// ```rust,ignore
/// impl_entity!(
///     Dealer,
///     "dealer",
///     "dealers",
///     unique: ["email"],
///     fields: [name, email, subscription_tier]
/// );
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $singular:expr,
        $plural:expr,
        unique: [ $( $unique_field:expr ),* $(,)? ],
        fields: [ $( $field:ident ),* $(,)? ]
    ) => {
        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn unique_fields() -> &'static [&'static str] {
                &[ $( $unique_field ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                if field == "id" {
                    return Some($crate::core::field::FieldValue::from(&self.id));
                }
                $(
                    if field == stringify!($field) {
                        return Some($crate::core::field::FieldValue::from(&self.$field));
                    }
                )*
                None
            }
        }

        impl $type {
            /// Update the updated_at timestamp to now
            pub fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }
        }
    };
}

/// Implement the string conversions of a wire enum
///
/// Generates `as_str`, `Display`, a case-insensitive `FromStr` that rejects
/// unknown values with `ServiceError::InvalidArgument`, and the
/// `FieldValue` conversion used by filtered scans.
///
/// # Example
///
/// ```rust,ignore
/// impl_wire_enum!(VehicleStatus, "vehicle status", {
///     Available => "AVAILABLE",
///     Sold => "SOLD",
/// });
/// ```
#[macro_export]
macro_rules! impl_wire_enum {
    (
        $type:ident,
        $label:expr,
        { $( $variant:ident => $wire:expr ),* $(,)? }
    ) => {
        impl $type {
            /// Every variant, in declaration order
            pub const ALL: &'static [$type] = &[ $( $type::$variant ),* ];

            /// The wire representation of this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $type::$variant => $wire ),*
                }
            }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $type {
            type Err = $crate::core::error::ServiceError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim();
                $type::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        $crate::core::error::ServiceError::invalid(format!(
                            "Unknown {}: '{}'",
                            $label, raw
                        ))
                    })
            }
        }

        impl From<&$type> for $crate::core::field::FieldValue {
            fn from(value: &$type) -> Self {
                $crate::core::field::FieldValue::String(value.as_str().to_string())
            }
        }
    };
}
