//! Declarative template for concrete object shapes.
//!
//! Each shape is `base` + one family block + its own fields. The template
//! generates the struct, its constructors, the [`CommonFields`] contract and
//! the per-field walks used by the validator, sanitizer and renderer, so a
//! shape is declared once as a plain field list.
//!
//! [`CommonFields`]: crate::model::CommonFields

macro_rules! stix_objects {
    (
        block $block:ident : $block_ty:ty;
        $(
            $(#[$meta:meta])*
            $name:ident {
                $(
                    $(#[$fmeta:meta])*
                    $field:ident : $fty:ty
                ),* $(,)?
            }
        )*
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
            pub struct $name {
                #[serde(flatten)]
                pub(crate) base: $crate::model::BaseIdentity,
                #[serde(flatten)]
                pub $block: $block_ty,
                $(
                    $(#[$fmeta])*
                    #[serde(default, skip_serializing_if = "crate::model::Blank::is_blank")]
                    pub $field: $fty,
                )*
            }

            impl $name {
                /// The discriminator of this shape.
                pub const KIND: $crate::model::ObjectKind = $crate::model::ObjectKind::$name;

                /// Creates a zero-valued object with a fresh random id.
                pub fn new() -> Self {
                    Self::with_id($crate::model::Identifier::new(Self::KIND))
                }

                /// Creates a zero-valued object with the given id.
                pub fn with_id(id: $crate::model::Identifier) -> Self {
                    Self {
                        base: $crate::model::BaseIdentity::with_id(Self::KIND, id),
                        $block: <$block_ty>::default(),
                        $( $field: Default::default(), )*
                    }
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl $crate::model::CommonFields for $name {
                fn base(&self) -> &$crate::model::BaseIdentity {
                    &self.base
                }

                fn block(&self) -> $crate::model::PropertyBlock<'_> {
                    $crate::model::AsBlock::as_block(&self.$block)
                }

                fn block_mut(&mut self) -> $crate::model::PropertyBlockMut<'_> {
                    $crate::model::AsBlock::as_block_mut(&mut self.$block)
                }
            }

            impl $crate::validate::CheckFields for $name {
                fn check_fields(&self, checker: &mut $crate::validate::Checker) {
                    $(
                        $crate::validate::FieldCheck::check_field(
                            &self.$field,
                            $crate::model::field_name(stringify!($field)),
                            checker,
                        );
                    )*
                }
            }

            impl $crate::sanitize::Sanitize for $name {
                fn sanitize(&mut self) {
                    $crate::sanitize::Sanitize::sanitize(&mut self.$block);
                    $(
                        $crate::sanitize::sanitize_field(
                            $crate::model::field_name(stringify!($field)),
                            &mut self.$field,
                        );
                    )*
                }
            }

            impl $crate::render::Render for $name {
                fn render(&self, out: &mut $crate::render::Renderer) {
                    $crate::render::Render::render(&self.base, out);
                    $crate::render::Render::render(&self.$block, out);
                    $(
                        $crate::render::RenderField::render_field(
                            &self.$field,
                            $crate::model::field_name(stringify!($field)),
                            out,
                        );
                    )*
                }
            }
        )*
    };
}
