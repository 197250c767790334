//! 以字符串形式存库、传输的枚举

/// 生成字符串枚举
///
/// 自动生成：
/// - enum 定义（带 serde 重命名与 ts-rs 导出）
/// - `as_str()` / `ALL`
/// - 带中文错误提示的 `Deserialize`
/// - `Display` / `FromStr`
#[macro_export]
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident($label:literal) {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        // derive 必须在前，`#[ts(...)]` 才能作为其辅助属性
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, ts_rs::TS)]
        $(#[$meta])*
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse::<$name>().map_err(serde::de::Error::custom)
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
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "无效的{}: '{}'. 支持: {}",
                        $label,
                        s,
                        [$($value),+].join(", ")
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::string_enum! {
        pub enum Fruit("水果") {
            Apple => "apple",
            BlueBerry => "blue_berry",
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("blue_berry".parse::<Fruit>(), Ok(Fruit::BlueBerry));
        assert_eq!(Fruit::Apple.to_string(), "apple");
        assert_eq!(Fruit::ALL.len(), 2);
    }

    #[test]
    fn test_deserialize_error_lists_values() {
        let err = serde_json::from_str::<Fruit>("\"pear\"").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pear"));
        assert!(msg.contains("apple, blue_berry"));
    }

    crate::string_enum! {
        // 带 ts 辅助属性
        #[ts(rename = "SeasonKind")]
        pub enum Season("季节") {
            Spring => "spring",
        }
    }

    #[test]
    fn test_ts_helper_attribute_accepted() {
        use ts_rs::TS;
        assert_eq!(Season::name(), "SeasonKind");
        assert_eq!(Season::Spring.as_str(), "spring");
    }

    #[test]
    fn test_serialize() {
        assert_eq!(
            serde_json::to_string(&Fruit::BlueBerry).unwrap(),
            "\"blue_berry\""
        );
    }
}
