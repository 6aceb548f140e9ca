//! Enumerated wire values used by the Medium resources.
//!
//! Every enum maps a closed set of wire strings to variants and carries an
//! `Unrecognized` variant for strings outside that set. Decoding only produces
//! `Unrecognized` when the caller opted into `UnknownVariantPolicy::Preserve`.

macro_rules! wire_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            /// A value outside the known set, kept verbatim.
            Unrecognized(String),
        }

        impl $name {
            /// The wire string for this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )*
                    $name::Unrecognized(raw) => raw.as_str(),
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, $name::Unrecognized(_))
            }
        }

        impl $crate::codec::WireEnum for $name {
            fn from_wire(raw: &str) -> Option<Self> {
                match raw {
                    $( $wire => Some($name::$variant), )*
                    _ => None,
                }
            }

            fn unrecognized(raw: String) -> Self {
                $name::Unrecognized(raw)
            }

            fn as_wire(&self) -> &str {
                self.as_str()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Role of a contributor within a publication.
    pub enum Role {
        /// Can publish, edit and delete posts in the publication.
        Editor => "editor",
        /// Can submit drafts for editors to review.
        Writer => "writer",
    }
}

wire_enum! {
    /// Visibility of a post.
    pub enum PublishStatus {
        Public => "public",
        Draft => "draft",
        Unlisted => "unlisted",
    }
}

wire_enum! {
    /// Licence a post is published under.
    pub enum License {
        AllRightsReserved => "all-rights-reserved",
        Cc40By => "cc-40-by",
        Cc40BySa => "cc-40-by-sa",
        Cc40ByNd => "cc-40-by-nd",
        Cc40ByNc => "cc-40-by-nc",
        Cc40ByNcNd => "cc-40-by-nc-nd",
        Cc40ByNcSa => "cc-40-by-nc-sa",
        Cc40Zero => "cc-40-zero",
        PublicDomain => "public-domain",
    }
}

wire_enum! {
    /// Markup of a new post's `content`.
    pub enum ContentFormat {
        Html => "html",
        Markdown => "markdown",
    }
}
