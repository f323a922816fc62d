/// 定义以字符串形式存储的枚举
///
/// 生成 serde 重命名、`as_str()`、`Display`、`FromStr` 以及 `ALL` 常量，
/// 数据库中统一保存 `as_str()` 的结果。
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, ts_rs::TS)]
        $(#[$meta])*
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "Invalid {}: '{}'. Expected one of: {}",
                        stringify!($name),
                        s,
                        [$($value),+].join(", ")
                    )),
                }
            }
        }
    };
}
