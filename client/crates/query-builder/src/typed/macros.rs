/// Implements [`Selectable`](crate::Selectable) for a shape and declares its fields struct.
///
/// Each entry is `member: Shape`, or `member: Shape => "graphqlName"` to give the member an
/// explicit name that bypasses the naming strategy. List members are declared with their
/// element shape so that sub-selections can be built on it.
///
/// ```
/// use graphql_query_builder::{selectable, Selectable};
///
/// struct Attack;
///
/// selectable! {
///     Attack => pub struct AttackFields {
///         name: String,
///         kind: String => "type",
///     }
/// }
///
/// assert_eq!(Attack::members().len(), 2);
/// assert_eq!(Attack::fields().kind.info().rename, Some("type"));
/// ```
#[macro_export]
macro_rules! selectable {
    (
        $(#[$attr:meta])*
        $shape:ty => $vis:vis struct $fields:ident {
            $($member:ident : $member_ty:ty $(=> $rename:literal)?),* $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis struct $fields {
            $(pub $member: $crate::Member<$member_ty>,)*
        }

        impl $crate::Selectable for $shape {
            type Fields = $fields;

            fn fields() -> Self::Fields {
                $fields {
                    $($member: $crate::Member::new(stringify!($member), $crate::__member_rename!($($rename)?)),)*
                }
            }

            fn members() -> &'static [$crate::MemberInfo] {
                const MEMBERS: &[$crate::MemberInfo] = &[
                    $($crate::MemberInfo::new(stringify!($member), $crate::__member_rename!($($rename)?)),)*
                ];
                MEMBERS
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __member_rename {
    () => {
        None
    };
    ($rename:literal) => {
        Some($rename)
    };
}
