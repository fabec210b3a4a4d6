use kochbuch::{parse, serialize, tokenize, Ingredient, Token};

const CHILI: &str = r#">> time required: 45 Minuten
>> Servings: 4
>> course: Hauptgericht
>> tags: scharf, Eintopf

> Schmeckt am nächsten Tag noch besser.

= Vorbereitung

@Zwiebeln{2%Stück}(fein gewürfelt) und @Knoblauch{3%Zehen}(gepresst) bereitstellen.
[- Wer es milder mag,
   nimmt nur eine Chili. -]

== Kochen ==

@Öl{2%EL} in einem #großen Topf{} erhitzen. -- nicht rauchen lassen
@Hackfleisch{500%g} darin ~anbraten{5-7%Minuten} krümelig braten.
@Passierte Tomaten{800%g}, @Kidneybohnen{1%Dose} und @Salz{=1%TL} zugeben.
~{30%Minuten} köcheln lassen, mit @Pfeffer abschmecken.
Mit @./Schmand-Dip{150%g} servieren.
"#;

#[test]
fn test_metadata() {
    let recipe = parse(CHILI);
    let entries: Vec<_> = recipe.metadata.iter().collect();
    assert_eq!(
        entries,
        vec![
            ("time required", "45 Minuten"),
            ("servings", "4"),
            ("course", "Hauptgericht"),
            ("tags", "scharf, Eintopf"),
        ]
    );
    assert_eq!(recipe.servings(), Some(4));
}

#[test]
fn test_sections_and_steps() {
    let recipe = parse(CHILI);
    let layout: Vec<_> = recipe
        .sections
        .iter()
        .map(|s| (s.name.as_str(), s.steps.len()))
        .collect();
    assert_eq!(layout, vec![("", 1), ("Vorbereitung", 2), ("Kochen", 5)]);

    assert!(recipe.sections[0].steps[0].is_note);
    assert_eq!(
        recipe.sections[1].steps[1].tokens,
        vec![Token::block_comment("Wer es milder mag,\nnimmt nur eine Chili.")]
    );
}

#[test]
fn test_ingredients_in_order() {
    let recipe = parse(CHILI);
    let names: Vec<_> = recipe.ingredients().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Zwiebeln",
            "Knoblauch",
            "Öl",
            "Hackfleisch",
            "Passierte Tomaten",
            "Kidneybohnen",
            "Salz",
            "Pfeffer",
        ]
    );

    let zwiebeln = recipe.ingredients().next().unwrap();
    assert_eq!(
        zwiebeln,
        &Ingredient::new("Zwiebeln")
            .with_amount("2", "Stück")
            .with_preparation("fein gewürfelt")
    );
    assert!(recipe.ingredients().any(|i| i.name == "Salz" && i.fixed));
}

#[test]
fn test_equipment_timers_and_references() {
    let recipe = parse(CHILI);
    assert_eq!(recipe.equipment().collect::<Vec<_>>(), vec!["großen Topf"]);

    let timers: Vec<_> = recipe
        .timers()
        .map(|t| (t.name.as_str(), t.duration.as_str(), t.unit.as_str()))
        .collect();
    assert_eq!(timers, vec![("anbraten", "5-7", "Minuten"), ("", "30", "Minuten")]);

    let refs: Vec<_> = recipe.recipe_refs().map(|r| r.target()).collect();
    assert_eq!(refs, vec!["Schmand-Dip"]);
}

#[test]
fn test_inline_comment_ends_step() {
    let recipe = parse(CHILI);
    let step = &recipe.sections[2].steps[0];
    assert_eq!(
        step.tokens.last(),
        Some(&Token::inline_comment("nicht rauchen lassen"))
    );
}

#[test]
fn test_normalised_output_is_stable() {
    let once = serialize(&parse(CHILI));
    assert!(once.starts_with(">> time required: 45 Minuten\n>> servings: 4\n"));
    assert!(once.contains("\n= Kochen\n"));
    assert_eq!(serialize(&parse(&once)), once);
}

#[test]
fn test_scaling_whole_recipe() {
    let scaled = parse(CHILI).scale_to_servings(6);
    let amount = |name: &str| {
        scaled
            .ingredients()
            .find(|i| i.name == name)
            .map(|i| i.amount.clone())
            .unwrap()
    };
    assert_eq!(amount("Hackfleisch"), "750");
    assert_eq!(amount("Zwiebeln"), "3");
    assert_eq!(amount("Salz"), "1");
    assert_eq!(amount("Pfeffer"), "");
    assert_eq!(scaled.metadata.get("servings"), Some("6"));
}

#[test]
fn test_tokenize_example_line() {
    let result = tokenize("Das @Hackfleisch{500%g} anbraten.");
    assert_eq!(
        result.tokens,
        vec![
            Token::text("Das "),
            Token::Ingredient(Ingredient::new("Hackfleisch").with_amount("500", "g")),
            Token::text(" anbraten."),
        ]
    );
    assert_eq!(result.open_block_comment, None);
}
