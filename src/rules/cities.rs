//! Built-in gazetteer: every city the dispatcher serves, with the surface forms
//! people actually type.
//!
//! Forms are written the way users write them (Ukrainian inflections, Russian
//! spellings, Latin transliterations). They go through the normalizer when the
//! gazetteer is built, so apostrophes and Russian stems rewritten by the alias
//! table end up in the same shape as normalized user input.

/// `(canonical, display, forms)`.
///
/// `canonical` is normalized at load; `display` is what replies show.
pub(crate) static CITIES: &[(&str, &str, &[&str])] = &[
    ("бабанка", "бабанка", &["бабанки", "бабанку", "бабанці", "babanka"]),
    ("баштанка", "баштанка", &["баштанки", "баштанку", "баштанці", "bashtanka"]),
    ("бориспіль", "бориспіль", &["борисполя", "борисполі", "борисполь", "boryspil", "borispol"]),
    ("велика виска", "велика виска", &["великої виски", "великій висці", "большая виска", "velyka vyska"]),
    ("вороновиця", "вороновиця", &["вороновиці", "вороновицю", "вороновица", "voronovytsia"]),
    ("вінниця", "вінниця", &["вінниці", "вінницю", "винница", "винницы", "vinnytsia", "vinnitsa"]),
    ("гайсин", "гайсин", &["гайсина", "гайсині", "haisyn"]),
    ("гришине", "гришине", &["гришиного", "гришиному", "гришино", "hryshyne"]),
    ("дніпро", "дніпро", &["дніпра", "дніпрі", "днепр", "днепра", "днепропетровск", "dnipro", "dnepr"]),
    ("добропілля", "добропілля", &["добропіллі", "доброполье", "доброполья", "dobropillia"]),
    ("дружківка", "дружківка", &["дружківки", "дружківку", "дружківці", "дружковка", "дружковки", "druzhkivka"]),
    ("житомир", "житомир", &["житомира", "житомирі", "zhytomyr", "zhitomir"]),
    ("запоріжжя", "запоріжжя", &["запоріжжі", "запорожье", "запорожья", "zaporizhzhia", "zaporozhye"]),
    ("знам'янка", "знам'янка", &["знам'янки", "знам'янку", "знам'янці", "знаменка", "знаменки", "znamianka"]),
    ("золотоноша", "золотоноша", &["золотоноші", "золотоношу", "zolotonosha"]),
    ("казанка", "казанка", &["казанки", "казанку", "казанці", "kazanka"]),
    ("кам'янка", "кам'янка", &["кам'янки", "кам'янку", "кам'янці", "каменка", "каменки", "kamianka"]),
    ("канів", "канів", &["канева", "каневі", "канев", "kaniv"]),
    ("карлівка", "карлівка", &["карлівки", "карлівку", "карловка", "karlivka"]),
    ("київ", "київ", &["києва", "києві", "киев", "киева", "kyiv", "kiev", "kyjiv"]),
    ("коблево", "коблево", &["коблевого", "коблеве", "koblevo"]),
    ("краматорськ", "краматорськ", &["краматорська", "краматорську", "краматорск", "краматорска", "kramatorsk"]),
    ("красноград", "красноград", &["краснограда", "красноград", "krasnohrad"]),
    ("краснопілка", "краснопілка", &["краснопілки", "краснопілку", "краснополка", "krasnopilka"]),
    ("кривий ріг", "кривий ріг", &["кривого рогу", "кривому розі", "кривой рог", "кривого рога", "kryvyi rih"]),
    ("кропивницький", "кропивницький", &["кропивницького", "кропивницькому", "кропивницкий", "кропивницкого", "kropyvnytskyi"]),
    ("лубни", "лубни", &["лубен", "лубнах", "лубны", "lubny"]),
    ("львів", "львів", &["львова", "львові", "львов", "lviv", "lvov"]),
    ("межова", "межова", &["межової", "межову", "межевая", "mezhova"]),
    ("миколаїв", "миколаїв", &["миколаєва", "миколаєві", "николаев", "николаева", "mykolaiv", "nikolaev"]),
    ("миколаївка", "миколаївка", &["миколаївки", "миколаївку", "николаевка", "mykolaivka"]),
    ("немирів", "немирів", &["немирова", "немирові", "немиров", "nemyriv"]),
    ("новий буг", "новий буг", &["нового бугу", "новому бузі", "новый буг", "novyi buh"]),
    ("новоархангельськ", "новоархангельськ", &["новоархангельська", "новоархангельск", "novoarkhanhelsk"]),
    ("самар", "новомосковськ (самар)", &["новомосковськ", "самара", "новомосковська", "новомосковск", "самару", "samar", "novomoskovsk"]),
    ("одеса", "одеса", &["одеси", "одесі", "одесу", "одесса", "одессы", "одессу", "odesa", "odessa"]),
    ("олександрівка", "олександрівка", &["олександрівки", "олександрівку", "александровка", "oleksandrivka"]),
    ("олександрія", "олександрія", &["олександрії", "олександрію", "александрия", "александрии", "oleksandriia"]),
    ("орадівка", "орадівка", &["орадівки", "орадівку", "oradivka"]),
    ("п'ятихатки", "п'ятихатки", &["п'ятихаток", "пятихатки", "pyatykhatky"]),
    ("павлоград", "павлоград", &["павлограда", "павлограді", "pavlohrad"]),
    ("пирятин", "пирятин", &["пирятина", "пирятині", "pyriatyn"]),
    ("покровськ", "покровськ", &["покровська", "покровську", "покровск", "pokrovsk"]),
    ("полтава", "полтава", &["полтави", "полтаві", "полтаву", "poltava"]),
    ("райгород", "райгород", &["райгорода", "райгороді", "raihorod"]),
    ("решетилівка", "решетилівка", &["решетилівки", "решетилівку", "решитилівка", "решетиловка", "reshetylivka"]),
    ("рівне", "рівне", &["рівного", "рівному", "ровно", "rivne"]),
    ("слов'янка", "слов'янка", &["слов'янки", "слов'янку", "славянка", "slovianka"]),
    ("слов'янськ", "слов'янськ", &["слов'янська", "слов'янську", "словянск", "славянск", "sloviansk"]),
    ("смоліне", "смоліне", &["смоліного", "смоліному", "смолино", "smoline"]),
    ("сміла", "сміла", &["сміли", "смілу", "смілі", "смела", "smila"]),
    ("суми", "суми", &["сум", "сумах", "сумы", "sumy"]),
    ("тернопіль", "тернопіль", &["тернополя", "тернополі", "тернополь", "ternopil"]),
    ("умань", "умань", &["умані", "uman"]),
    ("харків", "харків", &["харкова", "харкові", "харьков", "харькова", "kharkiv", "kharkov"]),
    ("хмельницький", "хмельницький", &["хмельницького", "хмельницькому", "хмельницкий", "khmelnytskyi"]),
    ("хмельове", "хмельове", &["хмельового", "хмелевое", "khmelove"]),
    ("хорол", "хорол", &["хорола", "хоролі", "khorol"]),
    ("черкаси", "черкаси", &["черкас", "черкасах", "черкассы", "cherkasy"]),
    ("ізюм", "ізюм", &["ізюма", "ізюмі", "изюм", "izium"]),
];
